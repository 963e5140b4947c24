//! Content classification
//!
//! Categories only change how a file is presented, never how its bytes
//! are sent.

use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "heic", "heif", "tif", "tiff", "svg",
];
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "mov", "avi", "webm", "m4v", "3gp", "flv", "wmv", "mpg", "mpeg", "ts",
];
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "aac", "ogg", "oga", "opus", "wav", "flac", "wma",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCategory {
    Image,
    Video,
    Audio,
    Generic,
}

impl ContentCategory {
    /// Classify by extension; image, then video, then audio
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return ContentCategory::Generic;
        };
        let ext = ext.to_ascii_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            ContentCategory::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            ContentCategory::Video
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            ContentCategory::Audio
        } else {
            ContentCategory::Generic
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ContentCategory::Image => "🖼️",
            ContentCategory::Video => "🎬",
            ContentCategory::Audio => "🎵",
            ContentCategory::Generic => "📄",
        }
    }
}
