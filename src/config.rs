//! Configuration management for the file relay
//!
//! Loaded once at startup from an optional `config.toml` with `RELAY_*`
//! environment overrides. The resulting value is immutable and shared
//! through an `Arc`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Complete relay configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    // ═══ ACCESS (required) ═══
    /// Credential of the chat transport. Never logged.
    pub bot_token: String,

    /// The single principal allowed to talk to the relay
    /// Environment: RELAY_ALLOWED_USER_ID
    pub allowed_user_id: i64,

    // ═══ STORAGE (required) ═══
    /// Where received media is persisted
    pub download_root: String,

    /// Library of files the user can pull back
    pub upload_root: String,

    // ═══ TRANSFER BEHAVIOR ═══
    /// Size ceiling for outgoing files, matching the transport's own limit
    pub max_send_size_mb: u64,

    /// Entries per browse page
    pub page_size: usize,

    /// Pause between two files of a folder send
    pub folder_send_delay_ms: u64,

    /// Failed names quoted in a folder send report
    pub max_reported_failures: usize,

    // ═══ CONSOLE FRONT END ═══
    pub console_inbox: String,
    pub console_outbox: String,
}

impl RelayConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Self::builder()?
            .add_source(File::with_name("config").required(false))
            .add_source(Self::environment())
            .build()?;

        let config: RelayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `RELAY_BOT_TOKEN` style overrides. Nested keys, if any are ever
    /// added, use a double underscore.
    fn environment() -> Environment {
        Environment::with_prefix("RELAY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Builder pre-seeded with every optional default
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("max_send_size_mb", 50)?
            .set_default("page_size", 8)?
            .set_default("folder_send_delay_ms", 500)?
            .set_default("max_reported_failures", 5)?
            .set_default("console_inbox", "./inbox")?
            .set_default("console_outbox", "./outbox")
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::Message("bot_token cannot be empty".into()));
        }

        if self.allowed_user_id <= 0 {
            return Err(ConfigError::Message(
                "allowed_user_id must be a positive numeric id".into(),
            ));
        }

        if self.download_root.trim().is_empty() {
            return Err(ConfigError::Message("download_root cannot be empty".into()));
        }

        if self.upload_root.trim().is_empty() {
            return Err(ConfigError::Message("upload_root cannot be empty".into()));
        }

        let (download, upload) = (self.download_root_path(), self.upload_root_path());
        if download.starts_with(&upload) || upload.starts_with(&download) {
            return Err(ConfigError::Message(
                "download_root and upload_root must be separate, non-nested directories".into(),
            ));
        }

        if self.page_size == 0 {
            return Err(ConfigError::Message(
                "page_size must be greater than 0".into(),
            ));
        }

        if self.max_send_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_send_size_mb must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn download_root_path(&self) -> PathBuf {
        PathBuf::from(self.download_root.trim())
    }

    pub fn upload_root_path(&self) -> PathBuf {
        PathBuf::from(self.upload_root.trim())
    }

    /// Get maximum outgoing file size in bytes
    pub fn max_send_size_bytes(&self) -> u64 {
        self.max_send_size_mb * 1024 * 1024
    }

    pub fn folder_send_delay(&self) -> Duration {
        Duration::from_millis(self.folder_send_delay_ms)
    }
}
