//! Error types
//!
//! Defines domain-specific error types for each module of the relay.

use std::io;
use thiserror::Error;

/// Storage and namespace errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// A user supplied path tried to leave its root. Never retried.
    #[error("path escapes its root: {0}")]
    PathEscape(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failures reported by the chat transport collaborator
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not fetch media: {0}")]
    Fetch(String),

    #[error("could not send: {0}")]
    Send(String),
}

/// Egress errors
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("{name} is {size} bytes, over the {limit} byte limit")]
    SizeExceeded { name: String, size: u64, limit: u64 },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] TransportError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("write failed: {0}")]
    Write(io::Error),
}

/// General relay error that encompasses all error types
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl From<io::Error> for RelayError {
    fn from(error: io::Error) -> Self {
        RelayError::Storage(StorageError::Io(error))
    }
}
