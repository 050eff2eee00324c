//! The simulated life history of one individual.
//!
//! A trajectory is built year by year by the engine and is read-only
//! afterwards. Only `observed_counts()` feeds inference; the per-year
//! table is for diagnostics and calibration checks.

use crate::{
    error::{SimError, SimResult},
    observation::{ObservedCount, SightingHistory},
    types::{Age, Year, YearIndex},
    yspb::Yspb,
};
use serde::{Deserialize, Serialize};

/// Full latent and observed state for one simulated year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearState {
    pub index:            YearIndex,
    pub calendar_year:    Option<Year>,
    pub age:              Age,
    pub alive:            bool,
    pub repro_active:     bool,
    pub had_birth_before: bool,
    pub yspb:             Yspb,
    pub birth_this_year:  bool,
    pub history:          SightingHistory,
    pub observed_count:   ObservedCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    years: Vec<YearState>,
}

/// Counts of each observed symbol over a trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedSummary {
    pub unobserved:     usize,
    pub seen:           usize,
    pub seen_with_calf: usize,
}

impl ObservedSummary {
    pub fn sightings(&self) -> usize {
        self.seen + self.seen_with_calf
    }

    pub fn add(&mut self, other: &ObservedSummary) {
        self.unobserved += other.unobserved;
        self.seen += other.seen;
        self.seen_with_calf += other.seen_with_calf;
    }
}

impl Trajectory {
    pub(crate) fn new(years: Vec<YearState>) -> Self {
        Self { years }
    }

    pub fn years(&self) -> &[YearState] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn year(&self, index: YearIndex) -> Option<&YearState> {
        self.years.get(index)
    }

    /// The observed sequence, one 0/1/2 value per year.
    pub fn observed_counts(&self) -> Vec<u8> {
        self.years.iter().map(|y| y.observed_count.value()).collect()
    }

    pub fn summary(&self) -> ObservedSummary {
        let mut summary = ObservedSummary::default();
        for year in &self.years {
            match year.observed_count {
                ObservedCount::Unobserved   => summary.unobserved += 1,
                ObservedCount::Seen         => summary.seen += 1,
                ObservedCount::SeenWithCalf => summary.seen_with_calf += 1,
            }
        }
        summary
    }

    pub fn births(&self) -> usize {
        self.years.iter().filter(|y| y.birth_this_year).count()
    }

    /// The diagnostic table as JSON, one object per year.
    pub fn to_diagnostic_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(&self.years)?)
    }

    /// Verify the per-year and year-to-year invariants.
    pub fn check_invariants(&self) -> SimResult<()> {
        for (i, y) in self.years.iter().enumerate() {
            let fail = |reason: &str| SimError::InvariantViolation {
                year:   i,
                reason: reason.to_string(),
            };

            if y.index != i {
                return Err(fail("year index out of sequence"));
            }
            if !y.alive && (y.birth_this_year || y.observed_count.is_sighting()) {
                return Err(fail("dead individual gave birth or was observed"));
            }
            if y.age < 0 && y.alive {
                return Err(fail("alive before birth"));
            }
            if !y.repro_active && y.birth_this_year {
                return Err(fail("birth while not reproductively active"));
            }
            if y.birth_this_year && y.yspb != Yspb::YearsSince(1) {
                return Err(fail("birth year must record yspb = 1"));
            }
            if y.observed_count == ObservedCount::SeenWithCalf && !y.birth_this_year {
                return Err(fail("calf observed without a birth"));
            }
            if y.had_birth_before == (y.yspb == Yspb::NotYetGivenBirth) {
                return Err(fail("birth history flag disagrees with yspb"));
            }

            if i == 0 {
                continue;
            }
            let prev = &self.years[i - 1];
            if y.age != prev.age + 1 {
                return Err(fail("age did not advance by one"));
            }
            if prev.had_birth_before && !y.had_birth_before {
                return Err(fail("birth history flag was cleared"));
            }
            if prev.birth_this_year && y.birth_this_year {
                return Err(fail("births in consecutive years"));
            }
            if y.history != prev.history.next(prev.observed_count) {
                return Err(fail("sighting history does not follow observed counts"));
            }
        }
        Ok(())
    }
}
