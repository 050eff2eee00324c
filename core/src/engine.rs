//! The trajectory engine: simulates one individual year by year.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Age                 (+1)
//!   2. Survival
//!   3. Reproductive activity
//!   4. Birth               (regime chosen from last year's history)
//!   5. YSPB update
//!   6. Birth history flag
//!   7. Sighting history    (from last year's observed count)
//!   8. Observation emission
//!
//! RULES:
//!   - Each year reads ONLY the previous year's state.
//!   - All randomness flows through the SimRng passed in by the caller.
//!   - An invalid-history error aborts the whole trajectory; no partial
//!     trajectory is returned.

use crate::{
    birth::BirthCovariates,
    config::SimConfig,
    error::{SimError, SimResult},
    observation::SightingHistory,
    repro::repro_active,
    rng::SimRng,
    sightings::SightingsRow,
    trajectory::{Trajectory, YearState},
    types::{Year, YearIndex},
    yspb::Yspb,
};

#[derive(Debug, Clone)]
pub struct SimEngine {
    config:    SimConfig,
    sightings: Option<SightingsRow>,
}

impl SimEngine {
    /// Build an engine from a validated config.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config, sightings: None })
    }

    /// Attach the field record used by sighting-aware survival.
    pub fn with_sightings(mut self, row: SightingsRow) -> Self {
        self.sightings = Some(row);
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn sightings(&self) -> Option<&SightingsRow> {
        self.sightings.as_ref()
    }

    /// Run the full simulation for `config.num_years` years.
    pub fn simulate(&self, rng: &mut SimRng) -> SimResult<Trajectory> {
        if self.config.survival.uses_sightings() && self.sightings.is_none() {
            return Err(SimError::config(
                "sightings",
                "sighting-aware survival needs a sightings row",
            ));
        }

        let num_years = self.config.num_years;
        let mut years = Vec::with_capacity(num_years);

        let mut current = self.initial_year(rng);
        self.trace(&current);
        years.push(current.clone());

        for index in 1..num_years {
            current = self.step(&current, index, rng)?;
            self.trace(&current);
            years.push(current.clone());
        }

        Ok(Trajectory::new(years))
    }

    /// Year 0: drawn from the initial-condition bundle.
    fn initial_year(&self, rng: &mut SimRng) -> YearState {
        let init = &self.config.initial;
        let age = init.age;

        // Draws are taken unconditionally so the stream layout does not
        // depend on the starting age.
        let alive = rng.chance(init.alive) && age >= 0;
        let had_birth_before = rng.chance(init.had_birth_before) && age >= 0;
        let history = SightingHistory::at_start(rng.chance(init.observed));

        let yspb = if had_birth_before {
            Yspb::YearsSince(init.yspb)
        } else {
            Yspb::NotYetGivenBirth
        };

        YearState {
            index: 0,
            calendar_year: self.calendar_year(0),
            age,
            alive,
            repro_active: repro_active(age, alive, self.config.maturity_age),
            had_birth_before,
            yspb,
            birth_this_year: false,
            history,
            observed_count: self.config.observation.sample(alive, false, history, rng),
        }
    }

    /// Advance one year.
    fn step(&self, prev: &YearState, index: YearIndex, rng: &mut SimRng) -> SimResult<YearState> {
        let calendar_year = self.calendar_year(index);

        // 1. Age
        let age = prev.age + 1;

        // 2. Survival
        let attested = self.attested_alive(calendar_year)?;
        let alive = self.config.survival.sample(age, prev.alive, attested, rng);

        // 3. Reproductive activity
        let repro_active = repro_active(age, alive, self.config.maturity_age);

        // 4. Birth
        let regime = self.config.birth.regime(prev.had_birth_before, prev.yspb)?;
        let cov = BirthCovariates {
            age,
            alive,
            repro_active,
            unobserved_last_year: !prev.observed_count.is_sighting(),
        };
        let birth = regime.sample(cov, rng);

        // 5–6. Birth history
        let yspb = prev.yspb.after_year(prev.had_birth_before, birth)?;
        let had_birth_before = prev.had_birth_before || birth;

        // 7. Sighting history
        let history = prev.history.next(prev.observed_count);

        // 8. Observation
        let observed_count = self.config.observation.sample(alive, birth, history, rng);

        Ok(YearState {
            index,
            calendar_year,
            age,
            alive,
            repro_active,
            had_birth_before,
            yspb,
            birth_this_year: birth,
            history,
            observed_count,
        })
    }

    fn calendar_year(&self, index: YearIndex) -> Option<Year> {
        self.config.start_year.map(|start| start + index as Year)
    }

    fn attested_alive(&self, calendar_year: Option<Year>) -> SimResult<bool> {
        if !self.config.survival.uses_sightings() {
            return Ok(false);
        }
        let row = self.sightings.as_ref().ok_or_else(|| {
            SimError::config("sightings", "sighting-aware survival needs a sightings row")
        })?;
        let year = calendar_year.ok_or_else(|| {
            SimError::config("start_year", "is required by sighting-aware survival")
        })?;
        Ok(row.attested_alive(year))
    }

    fn trace(&self, year: &YearState) {
        log::debug!(
            "year={} age={} alive={} repro={} birth={} yspb={:?} observed={}",
            year.index,
            year.age,
            year.alive,
            year.repro_active,
            year.birth_this_year,
            year.yspb,
            year.observed_count.value()
        );
    }
}

/// Convenience: simulate one trajectory from a config and a seed.
pub fn simulate(config: &SimConfig, seed: u64) -> SimResult<Trajectory> {
    let engine = SimEngine::new(config.clone())?;
    let mut rng = SimRng::seeded(seed);
    engine.simulate(&mut rng)
}

/// Observed counts only, for callers that compare against field data.
pub fn simulate_observed(config: &SimConfig, seed: u64) -> SimResult<Vec<u8>> {
    Ok(simulate(config, seed)?.observed_counts())
}
