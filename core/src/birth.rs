//! Birth sub-model.
//!
//! Two regimes, chosen each year from the individual's history:
//!   - NoBirthsYet:     no birth has ever happened; depends on age and on
//!                      whether the whale went unobserved last year.
//!   - HadBirthsBefore: at least one birth; also depends on YSPB, with a
//!                      shape chosen per model variant.
//!
//! The regimes share no parameters, so the choice is an enum selected per
//! step rather than a stored mode.

use crate::{
    error::{SimError, SimResult},
    link::logistic,
    rng::SimRng,
    types::Age,
    yspb::Yspb,
};
use serde::{Deserialize, Serialize};

/// `logistic(age * age_coef + unobserved_last_year * unobserved_last_year_coef + intercept)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoBirthsYet {
    pub intercept: f64,
    pub age_coef:  f64,
    #[serde(default)]
    pub unobserved_last_year_coef: f64,
}

/// Shape of the birth probability once a whale has given birth before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum HadBirthsBefore {
    /// `logistic(intercept)`
    Constant { intercept: f64 },
    /// `logistic(age * age_coef + intercept)`
    AgeLinear { intercept: f64, age_coef: f64 },
    /// `logistic(age * age_coef + intercept + yspb * yspb_coef + yspb² * yspb_sq_coef)`
    LinearYspb {
        intercept:    f64,
        age_coef:     f64,
        yspb_coef:    f64,
        yspb_sq_coef: f64,
    },
    /// `logistic(age * age_coef + intercept + width * (yspb - peak_yspb)²)`
    ///
    /// A negative `width` opens the parabola downwards and favours births
    /// near `peak_yspb`; a positive one suppresses them there.
    PeakedYspb {
        intercept: f64,
        age_coef:  f64,
        peak_yspb: f64,
        width:     f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthModel {
    pub no_births_yet:     NoBirthsYet,
    pub had_births_before: HadBirthsBefore,
}

/// Covariates the birth sub-model reads for one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthCovariates {
    pub age:          Age,
    pub alive:        bool,
    pub repro_active: bool,
    /// Last year's observed count was 0.
    pub unobserved_last_year: bool,
}

/// The regime active for one year, with the parameters it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BirthRegime<'a> {
    NoBirthsYet(&'a NoBirthsYet),
    HadBirthsBefore {
        shape: &'a HadBirthsBefore,
        /// Years since previous birth, as recorded for the previous year.
        yspb:  u32,
    },
}

impl BirthModel {
    /// Pick the regime from last year's history.
    ///
    /// A history flag without a recorded YSPB is an inconsistent state.
    pub fn regime(&self, had_birth_before: bool, yspb: Yspb) -> SimResult<BirthRegime<'_>> {
        if !had_birth_before {
            return Ok(BirthRegime::NoBirthsYet(&self.no_births_yet));
        }
        match yspb {
            Yspb::YearsSince(n) => Ok(BirthRegime::HadBirthsBefore {
                shape: &self.had_births_before,
                yspb:  n,
            }),
            Yspb::NotYetGivenBirth => Err(SimError::InvalidHistory),
        }
    }
}

impl NoBirthsYet {
    pub fn proba_give_birth(&self, cov: BirthCovariates) -> f64 {
        if !cov.alive || !cov.repro_active {
            return 0.0;
        }
        let unobserved = if cov.unobserved_last_year { 1.0 } else { 0.0 };
        logistic(
            cov.age as f64 * self.age_coef
                + unobserved * self.unobserved_last_year_coef
                + self.intercept,
        )
    }
}

impl HadBirthsBefore {
    pub fn proba_give_birth(&self, cov: BirthCovariates, yspb: u32) -> f64 {
        // No birth in the year right after a birth.
        if !cov.alive || !cov.repro_active || yspb == 1 {
            return 0.0;
        }
        let age = cov.age as f64;
        let y = yspb as f64;
        let predictor = match *self {
            Self::Constant { intercept } => intercept,
            Self::AgeLinear { intercept, age_coef } => age * age_coef + intercept,
            Self::LinearYspb { intercept, age_coef, yspb_coef, yspb_sq_coef } => {
                age * age_coef + intercept + y * yspb_coef + y * y * yspb_sq_coef
            }
            Self::PeakedYspb { intercept, age_coef, peak_yspb, width } => {
                age * age_coef + intercept + width * (y - peak_yspb).powi(2)
            }
        };
        logistic(predictor)
    }
}

impl BirthRegime<'_> {
    pub fn proba_give_birth(&self, cov: BirthCovariates) -> f64 {
        match self {
            Self::NoBirthsYet(params)             => params.proba_give_birth(cov),
            Self::HadBirthsBefore { shape, yspb } => shape.proba_give_birth(cov, *yspb),
        }
    }

    pub fn sample(&self, cov: BirthCovariates, rng: &mut SimRng) -> bool {
        rng.chance(self.proba_give_birth(cov))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NoBirthsYet(_)         => "no_births_yet",
            Self::HadBirthsBefore { .. } => "had_births_before",
        }
    }
}
