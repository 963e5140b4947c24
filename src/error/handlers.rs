//! Error handlers
//!
//! Converts errors into log entries and user-facing sentences.

use crate::error::types::{IngestError, RelayError, StorageError, TransferError, TransportError};
use log::{error, warn};

/// Generic text for failures nobody anticipated
pub const GENERIC_FAILURE: &str = "Something went wrong while handling that request.";

/// Handle a relay error
pub fn handle_error(err: &RelayError) {
    match err {
        RelayError::Storage(StorageError::PathEscape(p)) => {
            warn!("Rejected path escaping its root: {}", p)
        }
        RelayError::Storage(StorageError::NotFound(p)) => warn!("Lookup failed: {}", p),
        _ => error!("Relay error: {}", err),
    }
}

/// Convert an error into the sentence shown to the user
pub fn user_message(err: &RelayError) -> String {
    match err {
        RelayError::Storage(e) => storage_message(e),
        RelayError::Transfer(e) => transfer_message(e),
        RelayError::Ingest(e) => ingest_message(e),
        RelayError::Transport(e) => transport_message(e),
    }
}

fn storage_message(err: &StorageError) -> String {
    match err {
        StorageError::PathEscape(_) => "That path is not allowed.".into(),
        StorageError::NotFound(what) => format!("Not found: {what}"),
        StorageError::Io(e) => format!("Disk error: {e}"),
    }
}

fn transport_message(err: &TransportError) -> String {
    match err {
        TransportError::Fetch(reason) => format!("Could not fetch the file: {reason}"),
        TransportError::Send(reason) => format!("Could not send the file: {reason}"),
    }
}

pub fn transfer_message(err: &TransferError) -> String {
    match err {
        TransferError::SizeExceeded { size, limit, .. } => format!(
            "File too large ({}), the limit is {}",
            human_size(*size),
            human_size(*limit)
        ),
        TransferError::Storage(e) => storage_message(e),
        TransferError::Transport(e) => transport_message(e),
    }
}

pub fn ingest_message(err: &IngestError) -> String {
    match err {
        IngestError::Fetch(e) => transport_message(e),
        IngestError::Storage(e) => storage_message(e),
        IngestError::Write(e) => format!("Could not write the file: {e}"),
    }
}

/// Render a byte count the way captions and reports show it
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
