//! I/O and file-format errors.

use flowscope_core::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid PGM: {0}")]
    InvalidPgm(String),

    #[error("invalid flow file: {0}")]
    InvalidFlo(String),

    #[error(transparent)]
    Flow(#[from] FlowError),
}

pub type Result<T> = std::result::Result<T, IoError>;
