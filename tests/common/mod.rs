//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

use file_relay::Relay;
use file_relay::config::RelayConfig;
use file_relay::error::TransportError;
use file_relay::storage::Roots;
use file_relay::transfer::ContentCategory;
use file_relay::transport::{
    ByteStream, ChatId, ChatKind, MediaItem, MediaKind, MediaRef, Payload, Reply, Transport,
    Update, UpdateContext,
};

pub const PRINCIPAL: i64 = 4242;

#[derive(Debug, Clone)]
pub struct SentFile {
    pub chat: ChatId,
    pub name: String,
    pub caption: String,
    pub category: ContentCategory,
    pub bytes: Vec<u8>,
}

/// Transport double that serves media from memory and records everything
/// sent back.
#[derive(Default)]
pub struct MemoryTransport {
    media: Mutex<HashMap<String, (Vec<u8>, Option<String>)>>,
    sent: Mutex<Vec<SentFile>>,
    replies: Mutex<Vec<Reply>>,
}

impl MemoryTransport {
    pub fn add_media(&self, file_id: &str, bytes: &[u8], path_hint: Option<&str>) {
        self.media.lock().unwrap().insert(
            file_id.to_string(),
            (bytes.to_vec(), path_hint.map(str::to_string)),
        );
    }

    pub fn sent(&self) -> Vec<SentFile> {
        self.sent.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }

    pub fn reply_texts(&self) -> Vec<String> {
        self.replies().into_iter().map(|r| r.text).collect()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn fetch_media(&self, file_id: &str) -> Result<MediaRef, TransportError> {
        let (bytes, path_hint) = self
            .media
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| TransportError::Fetch(format!("unknown file id {file_id}")))?;

        Ok(MediaRef {
            stream: Box::new(std::io::Cursor::new(bytes)),
            path_hint,
        })
    }

    async fn send_bytes(
        &self,
        chat: ChatId,
        mut stream: ByteStream,
        file_name: &str,
        caption: &str,
        category: ContentCategory,
    ) -> Result<(), TransportError> {
        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;

        self.sent.lock().unwrap().push(SentFile {
            chat,
            name: file_name.to_string(),
            caption: caption.to_string(),
            category,
            bytes,
        });
        Ok(())
    }

    async fn send_reply(&self, _chat: ChatId, reply: Reply) -> Result<(), TransportError> {
        self.replies.lock().unwrap().push(reply);
        Ok(())
    }
}

pub struct Fixture {
    pub base: TempDir,
    pub roots: Roots,
    pub transport: Arc<MemoryTransport>,
    pub relay: Relay,
}

pub fn config(base: &Path) -> RelayConfig {
    RelayConfig {
        bot_token: "123456:test-token".into(),
        allowed_user_id: PRINCIPAL,
        download_root: base.join("downloads").to_string_lossy().into_owned(),
        upload_root: base.join("uploads").to_string_lossy().into_owned(),
        max_send_size_mb: 1,
        page_size: 8,
        folder_send_delay_ms: 0,
        max_reported_failures: 5,
        console_inbox: base.join("inbox").to_string_lossy().into_owned(),
        console_outbox: base.join("outbox").to_string_lossy().into_owned(),
    }
}

pub fn fixture() -> Fixture {
    let base = TempDir::new().unwrap();
    let config = Arc::new(config(base.path()));
    let roots = Roots::from_config(&config).unwrap();
    let transport = Arc::new(MemoryTransport::default());
    let relay = Relay::new(config, roots.clone(), transport.clone());
    Fixture {
        base,
        roots,
        transport,
        relay,
    }
}

pub fn put(root: &Path, rel: &str, body: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

pub fn from_principal(payload: Payload) -> Update {
    Update {
        context: UpdateContext {
            sender_id: Some(PRINCIPAL),
            chat_id: ChatId(PRINCIPAL),
            chat_kind: ChatKind::Direct,
        },
        payload,
    }
}

pub fn text(command: &str) -> Update {
    from_principal(Payload::Text(command.to_string()))
}

pub fn media(kind: MediaKind, file_id: &str, unique_id: &str, file_name: Option<&str>) -> MediaItem {
    MediaItem {
        kind,
        file_id: file_id.to_string(),
        unique_id: unique_id.to_string(),
        file_name: file_name.map(str::to_string),
    }
}
