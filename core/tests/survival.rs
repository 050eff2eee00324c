//! Survival sub-model.

use whalesim_core::{rng::SimRng, survival::SurvivalModel};

const FLAT: SurvivalModel = SurvivalModel::Constant { proba: 0.05 };

#[test]
fn unborn_is_never_alive() {
    for age in [-10, -2, -1] {
        for alive_before in [false, true] {
            assert_eq!(FLAT.proba_alive(age, alive_before, false), 0.0);
        }
    }
}

#[test]
fn birth_year_is_certain() {
    let models = [
        FLAT,
        SurvivalModel::Logistic { intercept: -100.0, age_coef: 5.0 },
        SurvivalModel::SightingAware { intercept: -100.0, age_coef: 5.0 },
    ];
    for model in &models {
        for alive_before in [false, true] {
            assert_eq!(
                model.proba_alive(0, alive_before, false),
                1.0,
                "{model:?} alive_before={alive_before}"
            );
        }
    }
}

#[test]
fn no_resurrection() {
    assert_eq!(FLAT.proba_alive(1, false, false), 0.0);
    let logistic = SurvivalModel::Logistic { intercept: 100.0, age_coef: 0.0 };
    assert_eq!(logistic.proba_alive(30, false, false), 0.0);
}

#[test]
fn alive_last_year_uses_configured_probability() {
    assert_eq!(FLAT.proba_alive(1, true, false), 0.05);
    // Attestation is ignored by variants that do not read sightings.
    assert_eq!(FLAT.proba_alive(1, true, true), 0.05);
}

#[test]
fn logistic_variant_uses_age() {
    let model = SurvivalModel::Logistic { intercept: 1.0, age_coef: 0.5 };
    let p = model.proba_alive(2, true, false);
    assert!((p - whalesim_core::link::logistic(2.0)).abs() < 1e-12);
}

#[test]
fn sighting_aware_override_forces_life() {
    let model = SurvivalModel::SightingAware { intercept: -50.0, age_coef: 0.0 };
    assert_eq!(model.proba_alive(20, true, true), 1.0);
    // Overrides a dead previous year too.
    assert_eq!(model.proba_alive(20, false, true), 1.0);
    // Still never alive before birth.
    assert_eq!(model.proba_alive(-1, true, true), 0.0);
    // Without attestation, falls back to the logistic rule.
    assert!(model.proba_alive(20, true, false) < 1e-20);
}

#[test]
fn sampled_survival_rate_matches_probability() {
    let model = SurvivalModel::Constant { proba: 0.8 };
    let mut rng = SimRng::seeded(2024);
    let n = 10_000;
    let survived = (0..n).filter(|_| model.sample(5, true, false, &mut rng)).count();
    let rate = survived as f64 / n as f64;
    assert!((rate - 0.8).abs() < 0.02, "survival rate {rate:.3}");
}
