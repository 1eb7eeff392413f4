//! Application error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid wave profiles: {0}")]
    InvalidWaves(String),

    #[error("terminal too small: {cols}x{rows} (need at least {min_cols}x{min_rows})")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;
