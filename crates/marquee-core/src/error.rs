use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    #[error("Invalid navigation target: {0}")]
    InvalidNavigationTarget(String),

    #[error("Suggestion engine stopped")]
    EngineStopped,
}

pub type Result<T> = std::result::Result<T, Error>;
