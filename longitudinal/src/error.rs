use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("no referential configured")]
    NoReferential,

    #[error("no distance configured")]
    NoDistance,

    #[error("invalid distance {0}, must be a positive number")]
    Distance(f64),
}

/// Failure reported by a remote collaborator.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("process failed: {0}")]
    Process(String),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}
