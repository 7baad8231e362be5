//! Error taxonomy for the layers around the revision loop.
//!
//! The loop itself is total: roles never fail and validation problems travel
//! as [`Feedback`](crate::domain::state::Feedback) data. These errors only
//! come from configuration loading and input decoding.

/// revloop errors.
#[derive(Debug, thiserror::Error)]
pub enum RevloopError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("batch run {index} failed: {detail}")]
    BatchTask { index: usize, detail: String },
}

/// Result type for revloop operations.
pub type Result<T> = std::result::Result<T, RevloopError>;
