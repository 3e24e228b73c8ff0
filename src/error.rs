use thiserror::Error;

use crate::backup::BackupError;
use crate::registry::StoreError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{0}")]
    Other(String),
}
