//! Top-level application errors.

use crate::host::HostError;
use artfolio_core::ConfigError;
use artfolio_core::storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Could not read script {path}: {source}")]
    ReadScript {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid event script: {0}")]
    Script(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
