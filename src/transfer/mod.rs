//! Transfer module
//!
//! Moves bytes between the transport and the storage roots: ingestion of
//! inbound media and egress of stored files and folders.

pub mod classify;
pub mod egress;
pub mod ingest;
pub mod results;

// Re-export key types and functions
pub use classify::ContentCategory;
pub use egress::Egress;
pub use ingest::{Ingestor, stored_name};
pub use results::{FolderSendReport, StoredFile, TransferOutcome};
