//! Filesystem-backed transport
//!
//! Stands in for a chat network when the relay is driven from the console:
//! media handles are paths under an inbox directory, sent files land in an
//! outbox directory and replies are printed to stdout.

use async_trait::async_trait;
use log::info;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{self, AsyncWriteExt};

use crate::error::TransportError;
use crate::storage::{safe_join, sanitize_filename};
use crate::transfer::classify::ContentCategory;
use crate::transport::{ByteStream, ChatId, MediaRef, Reply, Transport};

pub struct LocalTransport {
    inbox: PathBuf,
    outbox: PathBuf,
}

impl LocalTransport {
    pub fn new(inbox: impl Into<PathBuf>, outbox: impl Into<PathBuf>) -> std::io::Result<Self> {
        let inbox = inbox.into();
        let outbox = outbox.into();
        std::fs::create_dir_all(&inbox)?;
        std::fs::create_dir_all(&outbox)?;
        Ok(Self { inbox, outbox })
    }

    pub fn outbox(&self) -> &PathBuf {
        &self.outbox
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn fetch_media(&self, file_id: &str) -> Result<MediaRef, TransportError> {
        let path =
            safe_join(&self.inbox, file_id).map_err(|e| TransportError::Fetch(e.to_string()))?;
        let file = File::open(&path)
            .await
            .map_err(|e| TransportError::Fetch(format!("{file_id}: {e}")))?;

        Ok(MediaRef {
            stream: Box::new(file),
            path_hint: Some(file_id.to_string()),
        })
    }

    async fn send_bytes(
        &self,
        _chat: ChatId,
        mut stream: ByteStream,
        file_name: &str,
        caption: &str,
        category: ContentCategory,
    ) -> Result<(), TransportError> {
        let dest = self.outbox.join(sanitize_filename(file_name));
        let mut out = File::create(&dest)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;
        let bytes = io::copy(&mut stream, &mut out)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;

        info!(
            "Delivered {:?} {} ({} bytes) to {}: {}",
            category,
            file_name,
            bytes,
            dest.display(),
            caption
        );
        Ok(())
    }

    async fn send_reply(&self, chat: ChatId, reply: Reply) -> Result<(), TransportError> {
        let mut rendered = format!("[chat {}] {}\n", chat.0, reply.text);
        for row in &reply.buttons {
            let labels: Vec<String> = row
                .iter()
                .map(|b| format!("[{} => cb {}]", b.label, b.data))
                .collect();
            rendered.push_str(&labels.join(" "));
            rendered.push('\n');
        }

        let mut stdout = io::stdout();
        stdout
            .write_all(rendered.as_bytes())
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}
