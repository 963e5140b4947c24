//! Media ingestion
//!
//! Persists media pushed by the user under the download root. Names are
//! made unique by a UTC timestamp plus either the sanitized original name or
//! a transport-unique tag, so no existence check or locking is needed.
//! Bytes go to a hidden partial file first and are renamed into place only
//! once the write has completed.

use chrono::{DateTime, Utc};
use log::{error, info};
use std::path::{Path, PathBuf};
use tokio::fs::{File, remove_file, rename};
use tokio::io::{self, AsyncWriteExt};

use crate::error::IngestError;
use crate::navigate::resolver::PARTIAL_SUFFIX;
use crate::storage::{Root, Roots, safe_join, sanitize_filename};
use crate::transfer::classify::ContentCategory;
use crate::transfer::results::StoredFile;
use crate::transport::{ByteStream, MediaRef};

/// Longest extension accepted from transport path metadata, dot included
const MAX_HINT_EXTENSION_LEN: usize = 10;

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

pub struct Ingestor {
    download_root: PathBuf,
}

impl Ingestor {
    pub fn new(roots: &Roots) -> Self {
        Self {
            download_root: roots.download().to_path_buf(),
        }
    }

    /// Persist one media item and return the stored file.
    pub async fn ingest(
        &self,
        media: MediaRef,
        suggested_name: Option<&str>,
        fallback_tag: &str,
    ) -> Result<StoredFile, IngestError> {
        let name = stored_name(
            suggested_name,
            fallback_tag,
            media.path_hint.as_deref(),
            Utc::now(),
        );
        let dest = safe_join(&self.download_root, &name)?;
        let temp = partial_path(&dest, &name);

        let size = write_atomically(media.stream, &temp, &dest).await?;
        info!("Stored {} ({} bytes)", dest.display(), size);

        Ok(StoredFile {
            root: Root::Download,
            rel_path: name,
            category: ContentCategory::from_path(&dest),
            abs_path: dest,
            size,
        })
    }
}

/// Derive the on-disk name of an inbound item.
pub fn stored_name(
    suggested_name: Option<&str>,
    fallback_tag: &str,
    path_hint: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let stamp = now.format(TIMESTAMP_FORMAT);

    match suggested_name {
        Some(raw) => {
            let base = sanitize_filename(raw);
            let path = Path::new(&base);
            match (path.file_stem(), path.extension()) {
                (Some(stem), Some(ext)) => format!(
                    "{stamp}_{}.{}",
                    stem.to_string_lossy(),
                    ext.to_string_lossy()
                ),
                _ => format!("{stamp}_{base}{}", extension_from_hint(path_hint)),
            }
        }
        None => format!(
            "{stamp}_{}{}",
            sanitize_filename(fallback_tag),
            extension_from_hint(path_hint)
        ),
    }
}

/// Extension of the transport's path for a file, or empty when missing,
/// too long or not made of safe characters.
pub fn extension_from_hint(path_hint: Option<&str>) -> String {
    let Some(ext) = path_hint
        .map(Path::new)
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
    else {
        return String::new();
    };

    let ext = format!(".{ext}");
    let safe = ext
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if safe && ext.len() <= MAX_HINT_EXTENSION_LEN {
        ext
    } else {
        String::new()
    }
}

fn partial_path(dest: &Path, name: &str) -> PathBuf {
    dest.with_file_name(format!(".{name}{PARTIAL_SUFFIX}"))
}

/// Copy a stream to `temp` and move it over `dest` once complete. The
/// partial file is removed on any failure.
async fn write_atomically(
    mut stream: ByteStream,
    temp: &Path,
    dest: &Path,
) -> Result<u64, IngestError> {
    let mut file = match File::create(temp).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create partial file {}: {}", temp.display(), e);
            return Err(IngestError::Write(e));
        }
    };

    let written = async {
        let bytes = io::copy(&mut stream, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok::<u64, std::io::Error>(bytes)
    }
    .await;
    drop(file);

    let bytes = match written {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed writing {}: {}", temp.display(), e);
            let _ = remove_file(temp).await;
            return Err(IngestError::Write(e));
        }
    };

    if let Err(e) = rename(temp, dest).await {
        error!(
            "Failed to rename {} to {}: {}",
            temp.display(),
            dest.display(),
            e
        );
        let _ = remove_file(temp).await;
        return Err(IngestError::Write(e));
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::TempDir;
    use tokio::io::{AsyncRead, ReadBuf};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn suggested_name_keeps_stem_and_extension() {
        let name = stored_name(Some("My Photo!!.JPG"), "photo_abc123", None, fixed_time());
        assert_eq!(name, "20240309T070501Z_My_Photo_.JPG");
    }

    #[test]
    fn suggested_name_without_extension_uses_hint() {
        let name = stored_name(
            Some("holiday clip"),
            "video_xyz",
            Some("videos/file_12.mp4"),
            fixed_time(),
        );
        assert_eq!(name, "20240309T070501Z_holiday_clip.mp4");
    }

    #[test]
    fn fallback_tag_with_hint_extension() {
        let name = stored_name(None, "video_xyz", Some("videos/clip_1.mp4"), fixed_time());
        assert_eq!(name, "20240309T070501Z_video_xyz.mp4");

        let name = stored_name(None, "voice_q1", None, fixed_time());
        assert_eq!(name, "20240309T070501Z_voice_q1");

        let name = stored_name(None, "video_xyz", Some("videos/clip."), fixed_time());
        assert_eq!(name, "20240309T070501Z_video_xyz");
    }

    #[test]
    fn hint_extension_is_bounded() {
        assert_eq!(extension_from_hint(Some("a/b.verylongext")), "");
        assert_eq!(extension_from_hint(Some("a/b.123456789")), ".123456789");
        assert_eq!(extension_from_hint(Some("a/b.o k")), "");
        assert_eq!(extension_from_hint(Some("noext")), "");
        assert_eq!(extension_from_hint(Some("videos/clip.")), "");
        assert_eq!(extension_from_hint(None), "");
    }

    #[tokio::test]
    async fn ingest_lands_under_download_root() {
        let base = TempDir::new().unwrap();
        let roots = Roots::prepare(&base.path().join("dl"), &base.path().join("up")).unwrap();
        let ingestor = Ingestor::new(&roots);

        let media = MediaRef {
            stream: Box::new(&b"png bytes"[..]),
            path_hint: Some("photos/file_7.png".into()),
        };
        let stored = ingestor.ingest(media, None, "photo_abc").await.unwrap();

        assert_eq!(stored.root, Root::Download);
        assert!(stored.abs_path.starts_with(roots.download()));
        assert!(stored.rel_path.ends_with("_photo_abc.png"));
        assert_eq!(stored.size, 9);
        assert_eq!(stored.category, ContentCategory::Image);
        assert_eq!(std::fs::read(&stored.abs_path).unwrap(), b"png bytes");
    }

    struct BrokenStream;

    impl AsyncRead for BrokenStream {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Err(std::io::Error::other("connection reset")))
        }
    }

    #[tokio::test]
    async fn failed_write_leaves_nothing_behind() {
        let base = TempDir::new().unwrap();
        let roots = Roots::prepare(&base.path().join("dl"), &base.path().join("up")).unwrap();
        let ingestor = Ingestor::new(&roots);

        let media = MediaRef {
            stream: Box::new(BrokenStream),
            path_hint: None,
        };
        let result = ingestor.ingest(media, Some("doc.pdf"), "document_1").await;

        assert!(matches!(result, Err(IngestError::Write(_))));
        assert_eq!(std::fs::read_dir(roots.download()).unwrap().count(), 0);
    }
}
