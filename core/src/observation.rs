//! Observation emission: turns latent state into the sighting symbol.
//!
//! The only field a researcher compares against field data is the
//! `ObservedCount`. Everything else in a trajectory is latent.

use crate::{error::SimError, link::logistic, rng::SimRng};
use serde::{Deserialize, Serialize};

/// Per-year sighting symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ObservedCount {
    Unobserved   = 0,
    Seen         = 1,
    SeenWithCalf = 2,
}

impl ObservedCount {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn is_sighting(self) -> bool {
        self != Self::Unobserved
    }
}

impl From<ObservedCount> for u8 {
    fn from(count: ObservedCount) -> u8 {
        count.value()
    }
}

impl TryFrom<u8> for ObservedCount {
    type Error = SimError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unobserved),
            1 => Ok(Self::Seen),
            2 => Ok(Self::SeenWithCalf),
            other => Err(SimError::InvalidObservedCount(other)),
        }
    }
}

/// Sighting-history covariates for one year, derived from earlier
/// observed counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SightingHistory {
    /// Observed (count > 0) in the previous year.
    pub seen_last_year: bool,
    /// Observed in any year before this one.
    pub seen_before:    bool,
}

impl SightingHistory {
    /// History at the first simulated year: either seen before the
    /// simulation window (counted as last year) or never.
    pub fn at_start(seen: bool) -> Self {
        Self {
            seen_last_year: seen,
            seen_before:    seen,
        }
    }

    /// History for the following year, after `observed` was emitted.
    pub fn next(self, observed: ObservedCount) -> Self {
        let seen_last_year = observed.is_sighting();
        Self {
            seen_last_year,
            seen_before: seen_before_next(self.seen_before, seen_last_year),
        }
    }
}

/// Seen before year t: seen before t-1, or seen at t-1.
pub fn seen_before_next(seen_before_prev: bool, seen_prev: bool) -> bool {
    seen_before_prev || seen_prev
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ObservationModel {
    /// Single probability of being observed while alive.
    Flat { proba: f64 },
    /// Logistic in "seen last year" and "seen at any point before".
    SeenHistory {
        seen_last_year_coef: f64,
        seen_before_coef:    f64,
        constant:            f64,
    },
    /// Logistic in "seen at any point before" only.
    SeenPreviously {
        seen_before_coef: f64,
        constant:         f64,
    },
}

impl ObservationModel {
    /// Probability of a sighting for an individual known to be alive.
    pub fn proba_observed(&self, history: SightingHistory) -> f64 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match *self {
            Self::Flat { proba } => proba,
            Self::SeenHistory { seen_last_year_coef, seen_before_coef, constant } => logistic(
                flag(history.seen_last_year) * seen_last_year_coef
                    + flag(history.seen_before) * seen_before_coef
                    + constant,
            ),
            Self::SeenPreviously { seen_before_coef, constant } => {
                logistic(flag(history.seen_before) * seen_before_coef + constant)
            }
        }
    }

    /// Emit this year's observed count.
    ///
    /// A dead individual is never observed; no draw is made in that case.
    pub fn sample(
        &self,
        alive:   bool,
        birth:   bool,
        history: SightingHistory,
        rng:     &mut SimRng,
    ) -> ObservedCount {
        if !alive {
            return ObservedCount::Unobserved;
        }
        if !rng.chance(self.proba_observed(history)) {
            return ObservedCount::Unobserved;
        }
        if birth {
            ObservedCount::SeenWithCalf
        } else {
            ObservedCount::Seen
        }
    }
}
