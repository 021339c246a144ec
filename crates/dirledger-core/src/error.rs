use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("Scan run {0} does not exist")]
    RunNotFound(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
