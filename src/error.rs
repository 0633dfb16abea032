use thiserror::Error;

/// Data-validity failures inside the engine. None of these reach the user;
/// callers degrade to "fewer alerts" and log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("health snapshot unavailable: {0}")]
    SnapshotUnavailable(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
