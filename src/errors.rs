use thiserror::Error;

/// Failures of the crate's own helpers. Values raised by wrapped callbacks
/// never end up here; they travel as [`crate::Thrown`].
#[derive(Debug, Error)]
pub enum CatchError {
    // Text handed to `Thrown::parse_big_int` was not an integer literal
    #[error("invalid big integer literal: {0}")]
    InvalidBigInt(String),

    // A condition name was not found in the registry
    #[error("unknown catch condition: {0}")]
    UnknownCondition(String),
}

pub type Result<T> = std::result::Result<T, CatchError>;
