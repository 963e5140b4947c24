//! Egress dispatch
//!
//! Sends stored files back over the transport as unmodified byte streams.
//! Folder sends run strictly one file at a time with a fixed pause between
//! files and keep going when a single file fails.

use log::{error, info, warn};
use std::io;
use std::time::Duration;
use tokio::fs::{self, File};

use crate::config::RelayConfig;
use crate::error::handlers::transfer_message;
use crate::error::{StorageError, TransferError};
use crate::navigate::{FolderAddress, Namespace};
use crate::transfer::results::{FolderSendReport, StoredFile, TransferOutcome};
use crate::transport::{ChatId, Transport};

/// Transport limit for a single outgoing file
pub const DEFAULT_MAX_SEND_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Egress {
    max_size: u64,
    delay: Duration,
    max_failed_names: usize,
}

impl Egress {
    pub fn new(max_size: u64, delay: Duration, max_failed_names: usize) -> Self {
        Self {
            max_size,
            delay,
            max_failed_names,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(
            config.max_send_size_bytes(),
            config.folder_send_delay(),
            config.max_reported_failures,
        )
    }

    /// Send one file and report what happened.
    pub async fn send_file(
        &self,
        transport: &dyn Transport,
        chat: ChatId,
        file: &StoredFile,
    ) -> TransferOutcome {
        match self.try_send_file(transport, chat, file).await {
            Ok(bytes) => {
                info!("Sent {} from {} ({} bytes)", file.rel_path, file.root, bytes);
                TransferOutcome::Sent {
                    name: file.rel_path.clone(),
                    bytes,
                }
            }
            Err(e) => {
                warn!("Could not send {} from {}: {}", file.rel_path, file.root, e);
                TransferOutcome::Failed {
                    name: file.rel_path.clone(),
                    reason: transfer_message(&e),
                }
            }
        }
    }

    async fn try_send_file(
        &self,
        transport: &dyn Transport,
        chat: ChatId,
        file: &StoredFile,
    ) -> Result<u64, TransferError> {
        // The file may have changed since it was listed
        let size = match fs::metadata(&file.abs_path).await {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(file.rel_path.clone()).into());
            }
            Err(e) => return Err(StorageError::from(e).into()),
        };

        // Reject before the transport sees anything
        if size > self.max_size {
            return Err(TransferError::SizeExceeded {
                name: file.rel_path.clone(),
                size,
                limit: self.max_size,
            });
        }

        let handle = File::open(&file.abs_path).await.map_err(StorageError::from)?;
        let caption = StoredFile { size, ..file.clone() }.caption();
        transport
            .send_bytes(chat, Box::new(handle), file.file_name(), &caption, file.category)
            .await?;

        Ok(size)
    }

    /// Send every direct child file of a folder in listing order.
    pub async fn send_folder(
        &self,
        transport: &dyn Transport,
        namespace: &Namespace,
        chat: ChatId,
        folder: &FolderAddress,
    ) -> Result<FolderSendReport, StorageError> {
        let files = namespace.list_folder(folder).await.inspect_err(|e| {
            error!("Cannot list folder {}: {}", folder, e);
        })?;

        let mut report = FolderSendReport::new(folder.clone());
        for (i, file) in files.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let outcome = self.send_file(transport, chat, file).await;
            report.record(&outcome, self.max_failed_names);
        }

        info!(
            "Folder send of {} finished: {} sent, {} failed",
            folder, report.sent, report.failed
        );
        Ok(report)
    }
}

impl Default for Egress {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SEND_SIZE, Duration::from_millis(500), 5)
    }
}
