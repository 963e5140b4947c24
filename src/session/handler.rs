//! Relay state and update dispatch
//!
//! Checks access, then routes each update to ingestion or to the command
//! handlers. Failures are answered with a reply and never escape.

use log::{debug, error, info};
use std::sync::Arc;

use crate::auth::is_permitted;
use crate::config::RelayConfig;
use crate::error::handlers::{GENERIC_FAILURE, handle_error, ingest_message};
use crate::error::{IngestError, RelayError};
use crate::navigate::Namespace;
use crate::protocol::{Command, handle_command, parse_callback, parse_command};
use crate::storage::Roots;
use crate::transfer::{Egress, Ingestor, StoredFile};
use crate::transport::{ChatId, MediaItem, Payload, Reply, Transport, Update};

pub const NO_MEDIA: &str = "No downloadable media found in this message.";

/// Everything needed to serve the single principal.
pub struct Relay {
    config: Arc<RelayConfig>,
    namespace: Namespace,
    ingestor: Ingestor,
    egress: Egress,
    transport: Arc<dyn Transport>,
}

impl Relay {
    pub fn new(config: Arc<RelayConfig>, roots: Roots, transport: Arc<dyn Transport>) -> Self {
        Self {
            ingestor: Ingestor::new(&roots),
            egress: Egress::from_config(&config),
            namespace: Namespace::new(roots),
            config,
            transport,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn egress(&self) -> &Egress {
        &self.egress
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Handles one update end to end.
    ///
    /// Updates from anyone but the principal, or from outside a direct
    /// conversation, are dropped without a reply.
    pub async fn handle_update(&self, update: Update) {
        if !is_permitted(&self.config, &update.context) {
            debug!(
                "Dropping update from {:?} in {:?}",
                update.context.sender_id, update.context.chat_kind
            );
            return;
        }

        let chat = update.context.chat_id;
        let result = match update.payload {
            Payload::Media(items) => self.handle_media(chat, &items).await,
            Payload::Text(text) => self.run_command(chat, parse_command(&text)).await,
            Payload::Callback(data) => self.run_command(chat, parse_callback(&data)).await,
        };

        if let Err(e) = result {
            handle_error(&e);
            self.report_failure(chat).await;
        }
    }

    /// Generic reply for failures nothing else handled
    pub async fn report_failure(&self, chat: ChatId) {
        if let Err(e) = self.reply(chat, Reply::text(GENERIC_FAILURE)).await {
            error!("Could not report failure to chat {}: {}", chat.0, e);
        }
    }

    pub async fn reply(&self, chat: ChatId, reply: Reply) -> Result<(), RelayError> {
        self.transport.send_reply(chat, reply).await?;
        Ok(())
    }

    async fn run_command(&self, chat: ChatId, command: Command) -> Result<(), RelayError> {
        info!("Command from chat {}: {:?}", chat.0, command);
        if let Some(reply) = handle_command(self, chat, command).await? {
            self.reply(chat, reply).await?;
        }
        Ok(())
    }

    /// Items are ingested one after another; a failed item does not stop
    /// the rest and replies follow input order.
    async fn handle_media(&self, chat: ChatId, items: &[MediaItem]) -> Result<(), RelayError> {
        if items.is_empty() {
            return self.reply(chat, Reply::text(NO_MEDIA)).await;
        }

        for item in items {
            let text = match self.ingest_item(item).await {
                Ok(stored) => {
                    info!("Downloaded {} -> {}", item.file_id, stored.abs_path.display());
                    format!("Download complete. Saved to: {}", stored.abs_path.display())
                }
                Err(e) => {
                    error!("Download failed for {}: {}", item.file_id, e);
                    format!("Download failed: {}", ingest_message(&e))
                }
            };
            if let Err(e) = self.reply(chat, Reply::text(text)).await {
                handle_error(&e);
            }
        }
        Ok(())
    }

    async fn ingest_item(&self, item: &MediaItem) -> Result<StoredFile, IngestError> {
        let media = self.transport.fetch_media(&item.file_id).await?;
        self.ingestor
            .ingest(media, item.suggested_name(), &item.fallback_tag())
            .await
    }
}
