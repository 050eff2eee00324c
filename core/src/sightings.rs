//! Sightings rows: field observations of one whale, one count per year.
//!
//! Rows are contiguous: the first entry is `first_year`, the next is
//! `first_year + 1`, and so on. Values use the same 0/1/2 symbols the
//! simulator emits.

use crate::{
    error::{SimError, SimResult},
    observation::ObservedCount,
    types::{WhaleId, Year},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingsRow {
    first_year: Year,
    counts:     Vec<ObservedCount>,
}

impl SightingsRow {
    pub fn new(first_year: Year, counts: Vec<ObservedCount>) -> Self {
        Self { first_year, counts }
    }

    /// Build a row from raw 0/1/2 values.
    pub fn from_values(first_year: Year, values: &[u8]) -> SimResult<Self> {
        let counts = values
            .iter()
            .map(|&v| ObservedCount::try_from(v))
            .collect::<SimResult<Vec<_>>>()?;
        Ok(Self::new(first_year, counts))
    }

    pub fn first_year(&self) -> Year {
        self.first_year
    }

    /// Last covered year. For an empty row this is `first_year - 1`.
    pub fn last_year(&self) -> Year {
        self.first_year + self.counts.len() as Year - 1
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[ObservedCount] {
        &self.counts
    }

    pub fn years(&self) -> impl Iterator<Item = (Year, ObservedCount)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(move |(i, &c)| (self.first_year + i as Year, c))
    }

    /// Count for `year`, or None when the year is outside the row.
    pub fn get(&self, year: Year) -> Option<ObservedCount> {
        if year < self.first_year {
            return None;
        }
        self.counts.get((year - self.first_year) as usize).copied()
    }

    /// Like `get`, but an out-of-range year is an error.
    pub fn at(&self, year: Year) -> SimResult<ObservedCount> {
        self.get(year).ok_or(SimError::YearOutOfRange {
            year,
            first: self.first_year,
            last:  self.last_year(),
        })
    }

    /// Sum of the row's symbols.
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|c| c.value() as u32).sum()
    }

    pub fn first_sighting_year(&self) -> Option<Year> {
        self.years().find(|(_, c)| c.is_sighting()).map(|(y, _)| y)
    }

    /// All entries from the start of the row up to and including `year`.
    pub fn up_to(&self, year: Year) -> SightingsRow {
        let end = (year - self.first_year + 1).clamp(0, self.counts.len() as Year) as usize;
        Self::new(self.first_year, self.counts[..end].to_vec())
    }

    /// All entries from `year` (inclusive) to the end of the row.
    pub fn from_year(&self, year: Year) -> SightingsRow {
        let start = (year - self.first_year).clamp(0, self.counts.len() as Year) as usize;
        Self::new(self.first_year + start as Year, self.counts[start..].to_vec())
    }

    pub fn seen_at_or_before(&self, year: Year) -> bool {
        self.years().any(|(y, c)| y <= year && c.is_sighting())
    }

    pub fn seen_at_or_after(&self, year: Year) -> bool {
        self.years().any(|(y, c)| y >= year && c.is_sighting())
    }

    /// True when sightings bracket `year`, so the whale must have been
    /// alive that year.
    pub fn attested_alive(&self, year: Year) -> bool {
        self.seen_at_or_before(year) && self.seen_at_or_after(year)
    }

    /// Most recent year strictly before `year` with a calf sighting.
    pub fn last_birth_before(&self, year: Year) -> Option<Year> {
        self.years()
            .filter(|(y, c)| *y < year && *c == ObservedCount::SeenWithCalf)
            .map(|(y, _)| y)
            .last()
    }
}

/// Sightings for a whole population, keyed by whale id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingsTable {
    rows: BTreeMap<WhaleId, SightingsRow>,
}

impl SightingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, whale_id: impl Into<WhaleId>, row: SightingsRow) {
        self.rows.insert(whale_id.into(), row);
    }

    pub fn row(&self, whale_id: &str) -> SimResult<&SightingsRow> {
        self.rows.get(whale_id).ok_or_else(|| SimError::WhaleNotFound {
            whale_id: whale_id.to_string(),
        })
    }

    /// `whale_id`'s row from the start of the record up to `year`.
    pub fn since_beginning_up_to(&self, whale_id: &str, year: Year) -> SimResult<SightingsRow> {
        Ok(self.row(whale_id)?.up_to(year))
    }

    /// `whale_id`'s row from `start_year` to the final recorded year.
    pub fn from_start_year_up_to_final_year(
        &self,
        whale_id:   &str,
        start_year: Year,
    ) -> SimResult<SightingsRow> {
        Ok(self.row(whale_id)?.from_year(start_year))
    }

    pub fn whale_ids(&self) -> impl Iterator<Item = &WhaleId> {
        self.rows.keys()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
