use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("Invalid receipt: {0}")]
    InvalidInput(String),
    #[error("Receipt not found: {0}")]
    NotFound(String),
    #[error("Receipt already exists: {0}")]
    AlreadyExists(String),
    #[error("Persistence error: {0}")]
    PersistenceError(Box<dyn std::error::Error + Send + Sync>),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ReceiptError {
    /// Wraps a plain message as a persistence failure.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceError(Box::new(std::io::Error::other(message.into())))
    }
}

impl From<rusqlite::Error> for ReceiptError {
    fn from(err: rusqlite::Error) -> Self {
        Self::PersistenceError(Box::new(err))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for ReceiptError {
    fn from(err: rocksdb::Error) -> Self {
        Self::PersistenceError(Box::new(err))
    }
}

impl From<tokio::task::JoinError> for ReceiptError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::PersistenceError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ReceiptError>;
