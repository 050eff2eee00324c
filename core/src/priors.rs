//! Prior generation from a whale's sightings row.
//!
//! Each function looks at the field record around a target year and returns
//! either a strong Beta prior (the data settles the question) or a weak
//! Uniform one (the data is silent). These seed the simulator's initial
//! conditions and are sampled by the fitting layer.

use crate::{
    config::InitialConditions,
    error::{SimError, SimResult},
    observation::ObservedCount,
    rng::SimRng,
    sightings::SightingsRow,
    types::{Age, Year},
};
use rand::Rng;
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};

/// Oldest age the age prior will consider.
pub const MAX_AGE: Age = 80;

/// Pseudo-count behind a "strong" Beta prior. Mean 0.999, variance ~1e-6.
const STRONG_PRIOR_WEIGHT: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case")]
pub enum Prior {
    Uniform { low: f64, high: f64 },
    Beta { alpha: f64, beta: f64 },
}

impl Prior {
    /// Uniform over [0, 1].
    pub fn weak() -> Self {
        Self::Uniform { low: 0.0, high: 1.0 }
    }

    pub fn strong_yes() -> Self {
        Self::Beta { alpha: STRONG_PRIOR_WEIGHT, beta: 1.0 }
    }

    pub fn strong_no() -> Self {
        Self::Beta { alpha: 1.0, beta: STRONG_PRIOR_WEIGHT }
    }

    fn strong(yes: bool) -> Self {
        if yes {
            Self::strong_yes()
        } else {
            Self::strong_no()
        }
    }

    pub fn mean(&self) -> f64 {
        match *self {
            Self::Uniform { low, high } => (low + high) / 2.0,
            Self::Beta { alpha, beta }  => alpha / (alpha + beta),
        }
    }

    pub fn variance(&self) -> f64 {
        match *self {
            Self::Uniform { low, high } => (high - low).powi(2) / 12.0,
            Self::Beta { alpha, beta } => {
                let total = alpha + beta;
                alpha * beta / (total * total * (total + 1.0))
            }
        }
    }

    pub fn sample(&self, rng: &mut SimRng) -> SimResult<f64> {
        match *self {
            Self::Uniform { low, high } => {
                if !(low < high) {
                    return Err(SimError::InvalidPrior(format!(
                        "uniform bounds must satisfy low < high, got [{low}, {high})"
                    )));
                }
                Ok(rng.gen_range(low..high))
            }
            Self::Beta { alpha, beta } => {
                let dist = Beta::new(alpha, beta)
                    .map_err(|e| SimError::InvalidPrior(format!("beta({alpha}, {beta}): {e}")))?;
                Ok(dist.sample(rng))
            }
        }
    }
}

/// Minimum possible age of the whale in `year`: years since first sighting.
///
/// Negative when `year` precedes the first sighting. Refuses a row with no
/// sightings at all.
pub fn min_age(row: &SightingsRow, year: Year) -> SimResult<Age> {
    let first = row.first_sighting_year().ok_or(SimError::NoSightings)?;
    Ok(year - first)
}

/// Prior over the whale's age in `year`.
///
/// `known`: the whale was first sighted as a calf, so its age is pinned to
/// its minimum age. Otherwise any age from the minimum (or birth) up to
/// `MAX_AGE` is equally likely.
pub fn age_prior(row: &SightingsRow, year: Year, known: bool) -> SimResult<Prior> {
    let min = min_age(row, year)?;
    let prior = if known {
        Prior::Uniform { low: min as f64, high: (min + 1) as f64 }
    } else {
        let low = min.max(0);
        let high = MAX_AGE.max(low + 1);
        Prior::Uniform { low: low as f64, high: high as f64 }
    };
    Ok(prior)
}

/// Alive in `year`? Certain if the whale is sighted that year or later.
pub fn proba_alive_year_prior(row: &SightingsRow, year: Year) -> Prior {
    if row.seen_at_or_after(year) {
        Prior::strong_yes()
    } else {
        Prior::weak()
    }
}

/// Gave birth in `year`?
///
/// A calf sighting that year settles it; so does a sighting without calf.
/// A calf in an adjacent year rules it out, since births cannot be in
/// consecutive years.
pub fn proba_birth_year_prior(row: &SightingsRow, year: Year) -> Prior {
    match row.get(year) {
        Some(ObservedCount::SeenWithCalf) => Prior::strong_yes(),
        Some(ObservedCount::Seen)         => Prior::strong_no(),
        _ => {
            let calf_adjacent = [year - 1, year + 1]
                .iter()
                .any(|&y| row.get(y) == Some(ObservedCount::SeenWithCalf));
            if calf_adjacent {
                Prior::strong_no()
            } else {
                Prior::weak()
            }
        }
    }
}

/// Observed in `year`?
pub fn proba_observed_year_prior(row: &SightingsRow, year: Year) -> Prior {
    Prior::strong(row.get(year).is_some_and(|c| c.is_sighting()))
}

/// Seen in `year` or any year before it?
pub fn seen_previously_prior(row: &SightingsRow, year: Year) -> Prior {
    Prior::strong(row.seen_at_or_before(year))
}

/// Every prior the record implies for one whale and year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowPriors {
    pub min_age:         Age,
    pub age:             Prior,
    pub alive:           Prior,
    pub birth:           Prior,
    pub observed:        Prior,
    pub seen_previously: Prior,
}

pub fn row_priors(row: &SightingsRow, year: Year, known: bool) -> SimResult<RowPriors> {
    Ok(RowPriors {
        min_age:         min_age(row, year)?,
        age:             age_prior(row, year, known)?,
        alive:           proba_alive_year_prior(row, year),
        birth:           proba_birth_year_prior(row, year),
        observed:        proba_observed_year_prior(row, year),
        seen_previously: seen_previously_prior(row, year),
    })
}

/// Draw an initial-condition bundle for simulating from `year` onwards.
///
/// Age and survival come from the priors; birth history and YSPB come
/// straight from calf sightings before `year`; the start-of-window sighting
/// probability is the "seen previously" prior for the year before.
///
/// A known-age whale first sighted with a calf would be age 0 in the year
/// she gave birth; that row is rejected as `InvalidPrior`.
pub fn initial_conditions(
    row:   &SightingsRow,
    year:  Year,
    known: bool,
    rng:   &mut SimRng,
) -> SimResult<InitialConditions> {
    if known {
        if let Some(first) = row.first_sighting_year() {
            if row.get(first) == Some(ObservedCount::SeenWithCalf) {
                return Err(SimError::InvalidPrior(format!(
                    "known-age whale first sighted with a calf in {first}"
                )));
            }
        }
    }
    let age = age_prior(row, year, known)?.sample(rng)?.floor() as Age;
    let alive = proba_alive_year_prior(row, year).sample(rng)?;
    let observed = seen_previously_prior(row, year - 1).sample(rng)?;

    // One-based: the birth year itself counts as 1.
    let (had_birth_before, yspb) = match row.last_birth_before(year) {
        Some(birth_year) => (1.0, (year - birth_year + 1) as u32),
        None             => (0.0, 1),
    };

    Ok(InitialConditions {
        age,
        alive,
        had_birth_before,
        yspb,
        observed,
    })
}
