use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudtenderError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Failures reported by a [`crate::ProductIndex`] implementation.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index not initialized")]
    NotInitialized,

    #[error("Unknown candidate id: {0}")]
    UnknownCandidate(usize),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, BudtenderError>;
