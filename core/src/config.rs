//! Simulation configuration: one strongly-typed record per run.
//!
//! Model variants differ only in which sub-model variants they select, so a
//! single `SimConfig` covers all of them. `preset()` builds the named
//! variants with neutral coefficients; fitting code overwrites the fields.

use crate::{
    birth::{BirthModel, HadBirthsBefore, NoBirthsYet},
    error::{SimError, SimResult},
    observation::ObservationModel,
    repro::MATURITY_AGE,
    survival::SurvivalModel,
    types::{Age, Year},
};
use serde::{Deserialize, Serialize};

/// Largest coefficient magnitude `validate` accepts.
pub const MAX_COEFFICIENT: f64 = 1e6;

/// State of the individual in the first simulated year.
///
/// `alive`, `had_birth_before` and `observed` are probabilities; pass 0.0
/// or 1.0 to fix them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub age:              Age,
    pub alive:            f64,
    pub had_birth_before: f64,
    /// Years since previous birth at year 0, used when a prior birth is drawn.
    pub yspb:             u32,
    /// Probability that the whale was seen before the first simulated year.
    pub observed:         f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub num_years:    usize,
    /// Calendar year of year 0. Required for sighting-aware survival.
    #[serde(default)]
    pub start_year:   Option<Year>,
    #[serde(default = "default_maturity_age")]
    pub maturity_age: Age,
    pub initial:      InitialConditions,
    pub survival:     SurvivalModel,
    pub birth:        BirthModel,
    pub observation:  ObservationModel,
}

fn default_maturity_age() -> Age {
    MATURITY_AGE
}

/// The model variants the project has used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Age-linear birth, flat observation probability.
    SimpleLinear,
    /// Constant birth after the first, "seen previously" observation.
    NoYspb,
    /// Linear + quadratic YSPB terms, two-flag observation history.
    LinearYspb,
    /// Peaked YSPB parabola, logistic survival.
    QuadraticYspb,
}

impl SimConfig {
    /// Load from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json_str(&content)?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Config with hardcoded defaults for use in tests: 36 years,
    /// 0.95 survival, every coefficient set to 1.
    pub fn default_test() -> Self {
        Self {
            num_years:    36,
            start_year:   None,
            maturity_age: MATURITY_AGE,
            initial: InitialConditions {
                age:              1,
                alive:            1.0,
                had_birth_before: 0.0,
                yspb:             1,
                observed:         0.0,
            },
            survival: SurvivalModel::Constant { proba: 0.95 },
            birth: BirthModel {
                no_births_yet: NoBirthsYet {
                    intercept: 1.0,
                    age_coef:  1.0,
                    unobserved_last_year_coef: 0.0,
                },
                had_births_before: HadBirthsBefore::LinearYspb {
                    intercept:    1.0,
                    age_coef:     1.0,
                    yspb_coef:    1.0,
                    yspb_sq_coef: 1.0,
                },
            },
            observation: ObservationModel::SeenHistory {
                seen_last_year_coef: 1.0,
                seen_before_coef:    1.0,
                constant:            1.0,
            },
        }
    }

    pub fn preset(variant: ModelVariant) -> Self {
        let mut config = Self::default_test();
        match variant {
            ModelVariant::SimpleLinear => {
                config.birth.had_births_before = HadBirthsBefore::AgeLinear {
                    intercept: 1.0,
                    age_coef:  1.0,
                };
                config.observation = ObservationModel::Flat { proba: 0.5 };
            }
            ModelVariant::NoYspb => {
                config.birth.had_births_before = HadBirthsBefore::Constant { intercept: 1.0 };
                config.observation = ObservationModel::SeenPreviously {
                    seen_before_coef: 1.0,
                    constant:         1.0,
                };
            }
            ModelVariant::LinearYspb => {}
            ModelVariant::QuadraticYspb => {
                config.survival = SurvivalModel::Logistic {
                    intercept: 3.0,
                    age_coef:  0.0,
                };
                config.birth.had_births_before = HadBirthsBefore::PeakedYspb {
                    intercept: 1.0,
                    age_coef:  0.0,
                    peak_yspb: 3.0,
                    width:     -1.0,
                };
                config.observation = ObservationModel::SeenPreviously {
                    seen_before_coef: 1.0,
                    constant:         1.0,
                };
            }
        }
        config
    }

    /// Reject configurations that would make a probability fall outside
    /// [0, 1] or leave the YSPB seed undefined.
    ///
    /// Coefficients must be finite and no larger than `MAX_COEFFICIENT` in
    /// magnitude, so every linear predictor stays finite for any age or
    /// YSPB the driver can reach.
    pub fn validate(&self) -> SimResult<()> {
        if self.num_years == 0 {
            return Err(SimError::config("num_years", "must be at least 1"));
        }

        let init = &self.initial;
        check_probability("initial.alive", init.alive)?;
        check_probability("initial.had_birth_before", init.had_birth_before)?;
        check_probability("initial.observed", init.observed)?;
        if init.had_birth_before > 0.0 && init.yspb == 0 {
            return Err(SimError::config(
                "initial.yspb",
                "must be at least 1 when a prior birth is possible",
            ));
        }
        if init.had_birth_before > 0.0 && init.age <= self.maturity_age {
            log::warn!(
                "initial age {} is not past maturity ({}) but a prior birth is possible",
                init.age,
                self.maturity_age
            );
        }

        match self.survival {
            SurvivalModel::Constant { proba } => check_probability("survival.proba", proba)?,
            SurvivalModel::Logistic { intercept, age_coef }
            | SurvivalModel::SightingAware { intercept, age_coef } => {
                check_finite("survival.intercept", intercept)?;
                check_finite("survival.age_coef", age_coef)?;
            }
        }

        check_finite("birth.no_births_yet.intercept", self.birth.no_births_yet.intercept)?;
        check_finite("birth.no_births_yet.age_coef", self.birth.no_births_yet.age_coef)?;
        check_finite(
            "birth.no_births_yet.unobserved_last_year_coef",
            self.birth.no_births_yet.unobserved_last_year_coef,
        )?;
        let shape_coefs: Vec<(&str, f64)> = match self.birth.had_births_before {
            HadBirthsBefore::Constant { intercept } => vec![("intercept", intercept)],
            HadBirthsBefore::AgeLinear { intercept, age_coef } => {
                vec![("intercept", intercept), ("age_coef", age_coef)]
            }
            HadBirthsBefore::LinearYspb { intercept, age_coef, yspb_coef, yspb_sq_coef } => vec![
                ("intercept", intercept),
                ("age_coef", age_coef),
                ("yspb_coef", yspb_coef),
                ("yspb_sq_coef", yspb_sq_coef),
            ],
            HadBirthsBefore::PeakedYspb { intercept, age_coef, peak_yspb, width } => vec![
                ("intercept", intercept),
                ("age_coef", age_coef),
                ("peak_yspb", peak_yspb),
                ("width", width),
            ],
        };
        for (name, value) in shape_coefs {
            check_finite(&format!("birth.had_births_before.{name}"), value)?;
        }

        match self.observation {
            ObservationModel::Flat { proba } => check_probability("observation.proba", proba)?,
            ObservationModel::SeenHistory { seen_last_year_coef, seen_before_coef, constant } => {
                check_finite("observation.seen_last_year_coef", seen_last_year_coef)?;
                check_finite("observation.seen_before_coef", seen_before_coef)?;
                check_finite("observation.constant", constant)?;
            }
            ObservationModel::SeenPreviously { seen_before_coef, constant } => {
                check_finite("observation.seen_before_coef", seen_before_coef)?;
                check_finite("observation.constant", constant)?;
            }
        }

        if self.survival.uses_sightings() && self.start_year.is_none() {
            return Err(SimError::config(
                "start_year",
                "is required by sighting-aware survival",
            ));
        }
        Ok(())
    }
}

fn check_probability(field: &str, p: f64) -> SimResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SimError::config(field, format!("must be a probability in [0, 1], got {p}")))
    }
}

fn check_finite(field: &str, value: f64) -> SimResult<()> {
    if !value.is_finite() {
        Err(SimError::config(field, format!("must be finite, got {value}")))
    } else if value.abs() > MAX_COEFFICIENT {
        Err(SimError::config(
            field,
            format!("magnitude must not exceed {MAX_COEFFICIENT:e}, got {value}"),
        ))
    } else {
        Ok(())
    }
}
