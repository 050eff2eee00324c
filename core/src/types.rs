//! Shared primitive types used across the entire simulation.

/// Age in whole years. Negative before the individual is born.
pub type Age = i32;

/// A calendar year, as used to index sightings rows.
pub type Year = i32;

/// Position of a simulated year inside a trajectory. Year 0 is the
/// initial condition.
pub type YearIndex = usize;

/// A stable identifier for one whale in a sightings table.
pub type WhaleId = String;
