//! Years Since Previous Birth.
//!
//! YSPB is undefined until the first birth, so it is carried as a tagged
//! value rather than a number with a placeholder. Arithmetic is only
//! possible after matching on `YearsSince`.
//!
//! Convention: one-based. The birth year itself records `YearsSince(1)`,
//! the following year `YearsSince(2)`, and so on. The birth sub-model reads
//! the previous year's value, so a birth last year (`YearsSince(1)`) blocks
//! a birth this year.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "years", rename_all = "snake_case")]
pub enum Yspb {
    NotYetGivenBirth,
    YearsSince(u32),
}

impl Yspb {
    pub fn years(&self) -> Option<u32> {
        match self {
            Self::NotYetGivenBirth => None,
            Self::YearsSince(n)    => Some(*n),
        }
    }

    /// The value to record for a year, given the history flag carried in
    /// from the year before and whether a birth happened this year.
    ///
    /// Stays at `NotYetGivenBirth` until the first birth.
    pub fn after_year(self, had_birth_before: bool, birth: bool) -> SimResult<Yspb> {
        if !had_birth_before && !birth {
            return Ok(Yspb::NotYetGivenBirth);
        }
        years_since_previous_birth(had_birth_before, birth, self)
    }
}

/// Advance the YSPB counter by one year.
///
/// - `had_a_birth_prior`: was there any birth before `birth_last_year`'s year?
/// - `birth_last_year`:   did a birth happen in the year being closed?
/// - `previous`:          the counter as of the year before that.
///
/// Fails with `InvalidHistory` when no birth is recorded at all, or when a
/// prior birth is claimed but `previous` holds no count.
pub fn years_since_previous_birth(
    had_a_birth_prior: bool,
    birth_last_year:   bool,
    previous:          Yspb,
) -> SimResult<Yspb> {
    if birth_last_year {
        return Ok(Yspb::YearsSince(1));
    }
    if !had_a_birth_prior {
        return Err(SimError::InvalidHistory);
    }
    match previous {
        Yspb::YearsSince(n)    => Ok(Yspb::YearsSince(n.saturating_add(1))),
        Yspb::NotYetGivenBirth => Err(SimError::InvalidHistory),
    }
}
