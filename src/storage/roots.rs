//! Storage roots
//!
//! The relay owns exactly two disjoint directory trees.

use log::{info, warn};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::RelayConfig;

/// One of the two storage locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Root {
    /// Library of files to send; always searched first
    Upload,
    /// Media received from the user
    Download,
}

impl Root {
    /// Lookup order shared by every resolver operation
    pub const SEARCH_ORDER: [Root; 2] = [Root::Upload, Root::Download];

    pub fn label(&self) -> &'static str {
        match self {
            Root::Upload => "uploads",
            Root::Download => "downloads",
        }
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical absolute paths of both roots
#[derive(Debug, Clone)]
pub struct Roots {
    download: PathBuf,
    upload: PathBuf,
}

impl Roots {
    /// Create both roots with owner-only permissions and canonicalize them.
    /// Fails when the canonical trees are the same or nested.
    pub fn prepare(download: &Path, upload: &Path) -> io::Result<Self> {
        let download = prepare_root(download)?;
        let upload = prepare_root(upload)?;

        if download.starts_with(&upload) || upload.starts_with(&download) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "storage roots overlap: {} and {}",
                    download.display(),
                    upload.display()
                ),
            ));
        }

        Ok(Self { download, upload })
    }

    pub fn from_config(config: &RelayConfig) -> io::Result<Self> {
        Self::prepare(&config.download_root_path(), &config.upload_root_path())
    }

    pub fn path(&self, root: Root) -> &Path {
        match root {
            Root::Download => &self.download,
            Root::Upload => &self.upload,
        }
    }

    pub fn download(&self) -> &Path {
        &self.download
    }

    pub fn upload(&self) -> &Path {
        &self.upload
    }
}

fn prepare_root(path: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(path)?;
    restrict_permissions(path);
    let canonical = path.canonicalize()?;
    info!("Storage root ready: {}", canonical.display());
    Ok(canonical)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o700)) {
        warn!("Could not restrict permissions on {}: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn restrict_permissions(path: &Path) {
    warn!(
        "Owner-only permissions are not enforced on this platform: {}",
        path.display()
    );
}
