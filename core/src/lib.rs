//! Individual life-history simulator for a long-lived whale population.
//!
//! Given a parameter set, the engine produces a synthetic multi-year
//! sighting sequence (0 unobserved, 1 seen, 2 seen with calf) for one
//! individual, plus a diagnostic table of the latent state behind it.
//! The fitting procedure that compares these against field data lives
//! outside this crate.

pub mod batch;
pub mod birth;
pub mod config;
pub mod engine;
pub mod error;
pub mod link;
pub mod observation;
pub mod priors;
pub mod repro;
pub mod rng;
pub mod sightings;
pub mod survival;
pub mod trajectory;
pub mod types;
pub mod yspb;

pub use config::{InitialConditions, ModelVariant, SimConfig};
pub use engine::SimEngine;
pub use error::{SimError, SimResult};
pub use observation::ObservedCount;
pub use rng::{RngBank, SimRng};
pub use trajectory::{Trajectory, YearState};
pub use yspb::Yspb;
