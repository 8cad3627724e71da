use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("The leaderboard at {path} could not be opened")]
    PersistenceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Username rejected: {0}")]
    UsernameRejected(&'static str),
    #[error("The configuration at {path} is invalid: {reason}")]
    Config { path: PathBuf, reason: String },
    #[error(transparent)]
    ConfigFormat(#[from] serde_json::Error),
}

pub type GameResult<T> = Result<T, GameError>;
