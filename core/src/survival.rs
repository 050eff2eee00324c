//! Survival sub-model: is the individual alive this year?

use crate::{link::logistic, rng::SimRng, types::Age};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SurvivalModel {
    /// Flat yearly survival probability.
    Constant { proba: f64 },
    /// Yearly survival `logistic(age * age_coef + intercept)`.
    Logistic { intercept: f64, age_coef: f64 },
    /// As `Logistic`, but a sightings record that brackets the year
    /// forces survival to certainty.
    SightingAware { intercept: f64, age_coef: f64 },
}

impl SurvivalModel {
    pub fn uses_sightings(&self) -> bool {
        matches!(self, Self::SightingAware { .. })
    }

    /// Probability of being alive at `age`.
    ///
    /// `attested` is whether sightings bracket the current year. It is
    /// ignored by the variants that do not use sightings.
    pub fn proba_alive(&self, age: Age, alive_year_before: bool, attested: bool) -> f64 {
        if age < 0 {
            return 0.0;
        }
        // Sighted before and after: ground truth wins, even over a dead
        // previous year.
        if attested && self.uses_sightings() {
            return 1.0;
        }
        if age == 0 {
            return 1.0;
        }
        if !alive_year_before {
            return 0.0;
        }
        match *self {
            Self::Constant { proba } => proba,
            Self::Logistic { intercept, age_coef }
            | Self::SightingAware { intercept, age_coef } => {
                logistic(age as f64 * age_coef + intercept)
            }
        }
    }

    pub fn sample(
        &self,
        age:               Age,
        alive_year_before: bool,
        attested:          bool,
        rng:               &mut SimRng,
    ) -> bool {
        rng.chance(self.proba_alive(age, alive_year_before, attested))
    }
}
