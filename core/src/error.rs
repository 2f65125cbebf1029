//! Error types for the letterboard core.
//!
//! Session operations never fail. Errors only come from the edges: bank
//! storage, the bundled corpus, configuration files, and the remote
//! prediction and speech services.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LetterboardError {
    #[error("word bank not found: {0}")]
    NotFound(String),

    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("external service failure: {0}")]
    ExternalService(String),

    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<redb::DatabaseError> for LetterboardError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Storage(value.into())
    }
}

impl From<redb::TransactionError> for LetterboardError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Storage(value.into())
    }
}

impl From<redb::TableError> for LetterboardError {
    fn from(value: redb::TableError) -> Self {
        Self::Storage(value.into())
    }
}

impl From<redb::StorageError> for LetterboardError {
    fn from(value: redb::StorageError) -> Self {
        Self::Storage(value.into())
    }
}

impl From<redb::CommitError> for LetterboardError {
    fn from(value: redb::CommitError) -> Self {
        Self::Storage(value.into())
    }
}

pub type Result<T> = std::result::Result<T, LetterboardError>;
