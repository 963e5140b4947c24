//! Transfer result types
//!
//! Defines the stored file record and the outcomes of egress operations.

use std::fmt;
use std::path::PathBuf;

use crate::error::handlers::human_size;
use crate::navigate::FolderAddress;
use crate::storage::Root;
use crate::transfer::classify::ContentCategory;

/// A file under one of the roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub root: Root,
    /// Path relative to its root with `/` separators
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub size: u64,
    pub category: ContentCategory,
}

impl StoredFile {
    pub fn file_name(&self) -> &str {
        self.rel_path.rsplit('/').next().unwrap_or(&self.rel_path)
    }

    /// Caption shown next to the file when it is sent back
    pub fn caption(&self) -> String {
        format!(
            "{} {} ({})",
            self.category.emoji(),
            self.rel_path,
            human_size(self.size)
        )
    }
}

/// Result of one egress attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Sent { name: String, bytes: u64 },
    Failed { name: String, reason: String },
}

impl TransferOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, TransferOutcome::Sent { .. })
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferOutcome::Sent { name, bytes } => {
                write!(f, "Sent {} ({})", name, human_size(*bytes))
            }
            TransferOutcome::Failed { name, reason } => {
                write!(f, "Failed to send {name}: {reason}")
            }
        }
    }
}

/// Aggregate of a folder send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSendReport {
    pub folder: FolderAddress,
    pub sent: usize,
    pub failed: usize,
    /// First few failed names, capped by configuration
    pub failed_names: Vec<String>,
}

impl FolderSendReport {
    pub fn new(folder: FolderAddress) -> Self {
        Self {
            folder,
            sent: 0,
            failed: 0,
            failed_names: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: &TransferOutcome, max_failed_names: usize) {
        match outcome {
            TransferOutcome::Sent { .. } => self.sent += 1,
            TransferOutcome::Failed { name, .. } => {
                self.failed += 1;
                if self.failed_names.len() < max_failed_names {
                    self.failed_names.push(name.clone());
                }
            }
        }
    }

    pub fn total(&self) -> usize {
        self.sent + self.failed
    }
}

impl fmt::Display for FolderSendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return write!(f, "Folder {} has no files to send.", self.folder.label());
        }
        write!(
            f,
            "Folder {}: sent {}, failed {}.",
            self.folder.label(),
            self.sent,
            self.failed
        )?;
        if !self.failed_names.is_empty() {
            write!(f, "\nFailed: {}", self.failed_names.join(", "))?;
            let unlisted = self.failed - self.failed_names.len();
            if unlisted > 0 {
                write!(f, " and {unlisted} more")?;
            }
        }
        Ok(())
    }
}
