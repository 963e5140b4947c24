//! Chat transport boundary
//!
//! The relay never speaks a chat protocol itself. Everything it needs from
//! the messaging side goes through the [`Transport`] capability trait and
//! the plain update types defined here.

pub mod local;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::TransportError;
use crate::transfer::classify::ContentCategory;

pub use local::LocalTransport;

/// Raw bytes flowing in either direction
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Identifies the conversation a reply goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// One-to-one conversation with the bot
    Direct,
    Group,
    Channel,
}

/// Who sent an update and where
#[derive(Debug, Clone)]
pub struct UpdateContext {
    pub sender_id: Option<i64>,
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
}

/// Kinds of media the relay accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    Audio,
    Voice,
    VideoNote,
    Animation,
}

impl MediaKind {
    pub fn tag(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::VideoNote => "videonote",
            MediaKind::Animation => "animation",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "photo" => Some(MediaKind::Photo),
            "video" => Some(MediaKind::Video),
            "document" => Some(MediaKind::Document),
            "audio" => Some(MediaKind::Audio),
            "voice" => Some(MediaKind::Voice),
            "videonote" => Some(MediaKind::VideoNote),
            "animation" => Some(MediaKind::Animation),
            _ => None,
        }
    }

    /// Photos, voice notes and video notes never carry a usable name
    pub fn carries_name(&self) -> bool {
        !matches!(self, MediaKind::Photo | MediaKind::Voice | MediaKind::VideoNote)
    }
}

/// One media attachment of an inbound message
#[derive(Debug, Clone)]
pub struct MediaItem {
    pub kind: MediaKind,
    /// Handle used to fetch the bytes
    pub file_id: String,
    /// Stable identifier that is unique per file on the transport
    pub unique_id: String,
    pub file_name: Option<String>,
}

impl MediaItem {
    pub fn suggested_name(&self) -> Option<&str> {
        if !self.kind.carries_name() {
            return None;
        }
        self.file_name.as_deref().filter(|n| !n.trim().is_empty())
    }

    pub fn fallback_tag(&self) -> String {
        format!("{}_{}", self.kind.tag(), self.unique_id)
    }
}

/// Bytes of an inbound media item plus the transport's path for it
pub struct MediaRef {
    pub stream: ByteStream,
    pub path_hint: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Payload {
    Text(String),
    /// Data attached to a pressed button
    Callback(String),
    Media(Vec<MediaItem>),
}

#[derive(Debug, Clone)]
pub struct Update {
    pub context: UpdateContext,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Text reply with optional rows of buttons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub buttons: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }
}

/// Capabilities the relay consumes from the chat transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the bytes behind a media handle
    async fn fetch_media(&self, file_id: &str) -> Result<MediaRef, TransportError>;

    /// Deliver a file unmodified
    async fn send_bytes(
        &self,
        chat: ChatId,
        stream: ByteStream,
        file_name: &str,
        caption: &str,
        category: ContentCategory,
    ) -> Result<(), TransportError>;

    async fn send_reply(&self, chat: ChatId, reply: Reply) -> Result<(), TransportError>;
}
