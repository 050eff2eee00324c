//! End-to-end trajectory simulation.

use whalesim_core::{
    config::{ModelVariant, SimConfig},
    engine::{simulate, SimEngine},
    error::SimError,
    observation::{ObservationModel, ObservedCount},
    rng::SimRng,
    sightings::SightingsRow,
    survival::SurvivalModel,
    yspb::Yspb,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn no_two_year_window_reaches_four(counts: &[u8]) -> bool {
    counts.windows(2).all(|w| w[0] + w[1] < 4)
}

#[test]
fn thirty_six_years_have_no_contiguous_observed_births() {
    init_logging();
    let config = SimConfig::default_test();
    for seed in 0..200 {
        let trajectory = simulate(&config, seed).expect("simulate");
        let counts = trajectory.observed_counts();
        assert_eq!(counts.len(), 36);
        assert!(
            no_two_year_window_reaches_four(&counts),
            "seed {seed} produced contiguous observed births: {counts:?}"
        );
    }
}

#[test]
fn every_variant_keeps_its_invariants() {
    for variant in [
        ModelVariant::SimpleLinear,
        ModelVariant::NoYspb,
        ModelVariant::LinearYspb,
        ModelVariant::QuadraticYspb,
    ] {
        let mut config = SimConfig::preset(variant);
        config.num_years = 60;
        let engine = SimEngine::new(config).expect("engine");
        for seed in 0..100 {
            let trajectory = engine.simulate(&mut SimRng::seeded(seed)).expect("simulate");
            trajectory
                .check_invariants()
                .unwrap_or_else(|e| panic!("{variant:?} seed {seed}: {e}"));
            assert!(no_two_year_window_reaches_four(&trajectory.observed_counts()));
        }
    }
}

#[test]
fn mature_whales_do_give_birth() {
    // With every coefficient at 1 the first birth comes right after maturity.
    let config = SimConfig::default_test();
    let trajectory = simulate(&config, 7).unwrap();
    let alive_at_ten = trajectory.year(9).map(|y| y.alive).unwrap_or(false);
    if alive_at_ten {
        assert!(trajectory.births() > 0, "no births for a whale alive past maturity");
    }

    let pooled: usize = (0..50).map(|s| simulate(&config, s).unwrap().births()).sum();
    assert!(pooled > 50, "only {pooled} births across 50 whales");
}

#[test]
fn birth_years_reset_yspb_and_history() {
    let config = SimConfig::default_test();
    for seed in 0..50 {
        let trajectory = simulate(&config, seed).unwrap();
        let mut born = false;
        for year in trajectory.years() {
            if year.birth_this_year {
                assert_eq!(year.yspb, Yspb::YearsSince(1));
                born = true;
            }
            assert_eq!(year.had_birth_before, born);
            if !born {
                assert_eq!(year.yspb, Yspb::NotYetGivenBirth);
            }
        }
    }
}

#[test]
fn unborn_years_are_empty() {
    let mut config = SimConfig::default_test();
    config.initial.age = -3;
    config.observation = whalesim_core::observation::ObservationModel::Flat { proba: 1.0 };
    for seed in 0..20 {
        let trajectory = simulate(&config, seed).unwrap();
        for year in &trajectory.years()[..3] {
            assert!(year.age < 0);
            assert!(!year.alive);
            assert!(!year.birth_this_year);
            assert_eq!(year.observed_count, ObservedCount::Unobserved);
        }
        let birth_year = trajectory.year(3).unwrap();
        assert_eq!(birth_year.age, 0);
        assert!(birth_year.alive, "age 0 must be alive");
        assert_eq!(birth_year.observed_count, ObservedCount::Seen);
    }
}

#[test]
fn dead_at_start_stays_dead_and_unseen() {
    let mut config = SimConfig::default_test();
    config.initial.alive = 0.0;
    config.initial.observed = 1.0;
    config.observation = whalesim_core::observation::ObservationModel::Flat { proba: 1.0 };
    let trajectory = simulate(&config, 1).unwrap();
    assert!(trajectory.years().iter().all(|y| !y.alive));
    assert!(trajectory.observed_counts().iter().all(|&c| c == 0));
    assert_eq!(trajectory.summary().unobserved, 36);
}

#[test]
fn ages_advance_one_per_year() {
    let trajectory = simulate(&SimConfig::default_test(), 3).unwrap();
    for (i, year) in trajectory.years().iter().enumerate() {
        assert_eq!(year.index, i);
        assert_eq!(year.age, 1 + i as i32);
    }
}

#[test]
fn seen_flags_track_observed_counts() {
    let trajectory = simulate(&SimConfig::default_test(), 9).unwrap();
    let years = trajectory.years();
    for pair in years.windows(2) {
        let (prev, year) = (&pair[0], &pair[1]);
        assert_eq!(year.history.seen_last_year, prev.observed_count.is_sighting());
        assert_eq!(
            year.history.seen_before,
            prev.history.seen_before || prev.observed_count.is_sighting()
        );
    }
}

#[test]
fn prior_birth_at_start_is_honoured() {
    let mut config = SimConfig::default_test();
    config.initial.age = 20;
    config.initial.had_birth_before = 1.0;
    config.initial.yspb = 1;
    config.survival = SurvivalModel::Constant { proba: 1.0 };
    let trajectory = simulate(&config, 4).unwrap();
    let start = trajectory.year(0).unwrap();
    assert!(start.had_birth_before);
    assert_eq!(start.yspb, Yspb::YearsSince(1));
    // yspb 1 at year 0 blocks a birth at year 1.
    assert!(!trajectory.year(1).unwrap().birth_this_year);
    trajectory.check_invariants().unwrap();
}

#[test]
fn sighting_aware_survival_follows_the_record() {
    // Seen in 1980 and 1990; otherwise survival is hopeless.
    let row = SightingsRow::from_values(1980, &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0]).unwrap();
    let mut config = SimConfig::default_test();
    config.num_years = 13;
    config.start_year = Some(1980);
    config.initial.age = 5;
    config.survival = SurvivalModel::SightingAware { intercept: -50.0, age_coef: 0.0 };

    let engine = SimEngine::new(config).unwrap().with_sightings(row);
    for seed in 0..20 {
        let trajectory = engine.simulate(&mut SimRng::seeded(seed)).unwrap();
        for year in &trajectory.years()[..=10] {
            assert!(year.alive, "attested year {:?} must be alive", year.calendar_year);
        }
        assert!(!trajectory.year(11).unwrap().alive);
        assert_eq!(trajectory.year(12).unwrap().calendar_year, Some(1992));
    }
}

#[test]
fn sighting_aware_survival_without_a_row_fails() {
    let mut config = SimConfig::default_test();
    config.start_year = Some(1980);
    config.survival = SurvivalModel::SightingAware { intercept: 2.0, age_coef: 0.0 };
    let engine = SimEngine::new(config).unwrap();
    let err = engine.simulate(&mut SimRng::seeded(1)).expect_err("needs a row");
    assert!(matches!(err, SimError::InvalidConfig { .. }));
}

#[test]
fn diagnostic_table_exposes_latent_fields() {
    let trajectory = simulate(&SimConfig::default_test(), 5).unwrap();
    let json = trajectory.to_diagnostic_json().unwrap();
    let table: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = &table[0];
    for field in [
        "age",
        "alive",
        "repro_active",
        "had_birth_before",
        "yspb",
        "birth_this_year",
        "history",
        "observed_count",
    ] {
        assert!(first.get(field).is_some(), "missing {field}");
    }
    assert_eq!(table.as_array().unwrap().len(), 36);
}

#[test]
fn tampered_trajectory_fails_invariant_check() {
    let mut config = SimConfig::default_test();
    config.initial.alive = 0.0;
    let trajectory = simulate(&config, 1).unwrap();
    trajectory.check_invariants().unwrap();

    let mut value = serde_json::to_value(&trajectory).unwrap();
    value["years"][2]["observed_count"] = serde_json::json!(2);
    let tampered: whalesim_core::Trajectory = serde_json::from_value(value).unwrap();
    let err = tampered.check_invariants().expect_err("dead whale observed");
    assert!(matches!(err, SimError::InvariantViolation { year: 2, .. }), "{err:?}");
}

#[test]
fn first_birth_reads_last_years_observation() {
    let mut config = SimConfig::default_test();
    config.initial.age = 20;
    config.survival = SurvivalModel::Constant { proba: 1.0 };
    config.observation = ObservationModel::Flat { proba: 0.0 };
    config.birth.no_births_yet.intercept = 20.0;
    config.birth.no_births_yet.age_coef = 0.0;

    let with_births = simulate(&config, 41).unwrap();
    assert!(with_births.years()[1].birth_this_year);

    // Never observed, so a strongly negative coefficient suppresses every first birth.
    config.birth.no_births_yet.unobserved_last_year_coef = -1_000.0;
    for seed in 0..20 {
        let trajectory = simulate(&config, seed).unwrap();
        assert!(trajectory.years().iter().all(|y| !y.had_birth_before), "seed {seed}");
    }
}
