//! Reproductive activity: a maturity threshold gated on being alive.

use crate::types::Age;

/// Default age that must be exceeded before an individual can give birth.
pub const MATURITY_AGE: Age = 9;

pub fn repro_active(age: Age, alive: bool, maturity_age: Age) -> bool {
    alive && age > maturity_age
}
