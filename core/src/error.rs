use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("years since previous birth only makes sense when there has been a birth before")]
    InvalidHistory,

    #[error("Please make sure that the row has at least one sighting (i.e. value of 1 or 2)")]
    NoSightings,

    #[error("Invalid config: {field} {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Invalid observed count: {0} (expected 0, 1 or 2)")]
    InvalidObservedCount(u8),

    #[error("Year {year} is outside the sightings row ({first}..={last})")]
    YearOutOfRange { year: i32, first: i32, last: i32 },

    #[error("Whale '{whale_id}' not found")]
    WhaleNotFound { whale_id: String },

    #[error("Invalid prior: {0}")]
    InvalidPrior(String),

    #[error("Invariant violated at year {year}: {reason}")]
    InvariantViolation { year: usize, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub(crate) fn config(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field:  field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
