//! Namespace resolution
//!
//! Maps user tokens to files and folders across both roots. All operations
//! are read-only. Lookups search the upload root before the download root,
//! and within one root an exact path beats a case-insensitive scan.

use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::StorageError;
use crate::navigate::address::FolderAddress;
use crate::storage::{Root, Roots, safe_join, safe_join_dir};
use crate::transfer::classify::ContentCategory;
use crate::transfer::results::StoredFile;

/// Suffix of in-progress downloads, which stay invisible to listings
pub const PARTIAL_SUFFIX: &str = ".part";

/// Read-only view over both storage roots
#[derive(Debug, Clone)]
pub struct Namespace {
    roots: Roots,
}

/// Entries found below a root, sorted by relative path
#[derive(Debug, Default)]
struct Tree {
    files: Vec<String>,
    dirs: Vec<String>,
}

impl Namespace {
    pub fn new(roots: Roots) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    /// Find a file by relative path or name.
    pub async fn find_file(&self, token: &str) -> Result<StoredFile, StorageError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(StorageError::NotFound("(empty file name)".into()));
        }

        for root in Root::SEARCH_ORDER {
            let root_path = self.roots.path(root);

            // Exact path first; an escape attempt is final
            match safe_join(root_path, token) {
                Ok(path) => {
                    if is_regular_file(&path).await {
                        return self.stored_file(root, &path).await;
                    }
                }
                Err(e @ StorageError::PathEscape(_)) => return Err(e),
                Err(e) => debug!("Exact lookup of {} in {} failed: {}", token, root, e),
            }

            let tree = match walk(root_path).await {
                Ok(tree) => tree,
                Err(e) => {
                    warn!("Cannot scan {} root {}: {}", root, root_path.display(), e);
                    continue;
                }
            };

            if let Some(rel) = match_ignore_case(&tree.files, token) {
                let path = safe_join(root_path, rel)?;
                return self.stored_file(root, &path).await;
            }
        }

        Err(StorageError::NotFound(token.to_string()))
    }

    /// Find a folder and return its canonical address.
    ///
    /// Exact paths of every reading of the token are tried before any
    /// case-insensitive scan, so a folder that really carries the name
    /// beats a loose match elsewhere.
    pub async fn find_folder(&self, token: &str) -> Result<FolderAddress, StorageError> {
        let candidates = FolderAddress::candidates(token);

        for candidate in &candidates {
            if candidate.is_root() {
                return Ok(candidate.clone());
            }

            let root_path = self.roots.path(candidate.root);
            match safe_join_dir(root_path, &candidate.path) {
                Ok(path) => {
                    if is_directory(&path).await {
                        return Ok(FolderAddress::new(
                            candidate.root,
                            relative_to(root_path, &path),
                        ));
                    }
                }
                Err(e @ StorageError::PathEscape(_)) => return Err(e),
                Err(e) => debug!("Exact lookup of folder {} failed: {}", candidate, e),
            }
        }

        for candidate in &candidates {
            let root_path = self.roots.path(candidate.root);
            match walk(root_path).await {
                Ok(tree) => {
                    if let Some(rel) = match_ignore_case(&tree.dirs, &candidate.path) {
                        return Ok(FolderAddress::new(candidate.root, rel.clone()));
                    }
                }
                Err(e) => warn!(
                    "Cannot scan {} root {}: {}",
                    candidate.root,
                    root_path.display(),
                    e
                ),
            }
        }

        Err(StorageError::NotFound(token.trim().to_string()))
    }

    /// Direct child files of a folder, sorted by relative path.
    pub async fn list_folder(&self, folder: &FolderAddress) -> Result<Vec<StoredFile>, StorageError> {
        let root_path = self.roots.path(folder.root);
        let dir = safe_join_dir(root_path, &folder.path)?;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(folder.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !file_type.is_file() || is_partial(&name) {
                continue;
            }
            match self.stored_file(folder.root, &entry.path()).await {
                Ok(file) => files.push(file),
                Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(files)
    }

    /// Every file in both roots, globally sorted by relative path.
    pub async fn list_all_files(&self) -> Vec<StoredFile> {
        let mut files = Vec::new();

        for root in Root::SEARCH_ORDER {
            let root_path = self.roots.path(root);
            let tree = match walk(root_path).await {
                Ok(tree) => tree,
                Err(e) => {
                    warn!("Cannot list {} root {}: {}", root, root_path.display(), e);
                    continue;
                }
            };

            for rel in &tree.files {
                match self.stored_file(root, &root_path.join(rel)).await {
                    Ok(file) => files.push(file),
                    Err(e) => warn!("Skipping {} in {}: {}", rel, root, e),
                }
            }
        }

        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path).then(a.root.cmp(&b.root)));
        files
    }

    /// Every folder, upload root first. Each root contributes itself even
    /// when it holds no subdirectories or cannot be read.
    pub async fn list_all_folders(&self) -> Vec<FolderAddress> {
        let mut folders = Vec::new();

        for root in Root::SEARCH_ORDER {
            folders.push(FolderAddress::root_of(root));

            let root_path = self.roots.path(root);
            match walk(root_path).await {
                Ok(tree) => folders.extend(tree.dirs.into_iter().map(|d| FolderAddress::new(root, d))),
                Err(e) => warn!("Cannot list {} root {}: {}", root, root_path.display(), e),
            }
        }

        folders
    }

    async fn stored_file(&self, root: Root, path: &Path) -> Result<StoredFile, StorageError> {
        let metadata = fs::metadata(path).await?;
        Ok(StoredFile {
            root,
            rel_path: relative_to(self.roots.path(root), path),
            abs_path: path.to_path_buf(),
            size: metadata.len(),
            category: ContentCategory::from_path(path),
        })
    }
}

/// Whether a directory entry is an unfinished download
pub fn is_partial(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)
}

async fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

async fn is_directory(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

fn relative_to(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// First entry whose path, then whose final name, equals the token
/// ignoring case
fn match_ignore_case<'a>(entries: &'a [String], token: &str) -> Option<&'a String> {
    let wanted = token
        .trim()
        .replace('\\', "/")
        .trim_start_matches("./")
        .trim_matches('/')
        .to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    entries
        .iter()
        .find(|rel| rel.to_lowercase() == wanted)
        .or_else(|| {
            if wanted.contains('/') {
                return None;
            }
            entries.iter().find(|rel| {
                rel.rsplit('/')
                    .next()
                    .is_some_and(|name| name.to_lowercase() == wanted)
            })
        })
}

/// Walk a root without following symlinks. An unreadable root is an error;
/// unreadable subdirectories are skipped with a warning.
async fn walk(root: &Path) -> io::Result<Tree> {
    let mut tree = Tree::default();
    let mut pending: Vec<(PathBuf, String)> = vec![(root.to_path_buf(), String::new())];
    let mut at_root = true;

    while let Some((dir, rel)) = pending.pop() {
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if at_root => return Err(e),
            Err(e) => {
                warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                continue;
            }
        };
        at_root = false;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let child_rel = if rel.is_empty() {
                name.clone()
            } else {
                format!("{rel}/{name}")
            };

            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                tree.dirs.push(child_rel.clone());
                pending.push((entry.path(), child_rel));
            } else if file_type.is_file() && !is_partial(&name) {
                tree.files.push(child_rel);
            }
        }
    }

    tree.files.sort();
    tree.dirs.sort();
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn namespace() -> (TempDir, Namespace) {
        let base = TempDir::new().unwrap();
        let roots = Roots::prepare(&base.path().join("dl"), &base.path().join("up")).unwrap();
        (base, Namespace::new(roots))
    }

    fn put(root: &Path, rel: &str, body: &[u8]) {
        let path = root.join(rel);
        stdfs::create_dir_all(path.parent().unwrap()).unwrap();
        stdfs::write(path, body).unwrap();
    }

    #[tokio::test]
    async fn upload_exact_match_wins_over_download() {
        let (_base, ns) = namespace();
        put(ns.roots().upload(), "Report.pdf", b"upload");
        put(ns.roots().download(), "report.pdf", b"download");

        let file = ns.find_file("Report.pdf").await.unwrap();
        assert_eq!(file.root, Root::Upload);
        assert_eq!(file.rel_path, "Report.pdf");
    }

    #[tokio::test]
    async fn case_insensitive_scan_in_upload_beats_download_exact() {
        let (_base, ns) = namespace();
        put(ns.roots().upload(), "docs/Report.PDF", b"upload");
        put(ns.roots().download(), "report.pdf", b"download");

        let file = ns.find_file("report.pdf").await.unwrap();
        assert_eq!(file.root, Root::Upload);
        assert_eq!(file.rel_path, "docs/Report.PDF");
    }

    #[tokio::test]
    async fn falls_back_to_download_root() {
        let (_base, ns) = namespace();
        put(ns.roots().download(), "20240101T000000Z_clip.mp4", b"1234");

        let file = ns.find_file("20240101t000000z_CLIP.mp4").await.unwrap();
        assert_eq!(file.root, Root::Download);
        assert_eq!(file.size, 4);
        assert_eq!(file.category, ContentCategory::Video);
    }

    #[tokio::test]
    async fn find_file_rejects_escape_and_reports_missing() {
        let (_base, ns) = namespace();
        assert!(matches!(
            ns.find_file("../../etc/passwd").await,
            Err(StorageError::PathEscape(_))
        ));
        assert!(matches!(
            ns.find_file("nothing.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn find_folder_returns_canonical_address() {
        let (_base, ns) = namespace();
        stdfs::create_dir_all(ns.roots().upload().join("Music/Live")).unwrap();
        stdfs::create_dir_all(ns.roots().download().join("Trips")).unwrap();

        assert_eq!(
            ns.find_folder("music/live").await.unwrap(),
            FolderAddress::new(Root::Upload, "Music/Live")
        );
        assert_eq!(
            ns.find_folder("trips-d").await.unwrap(),
            FolderAddress::new(Root::Download, "Trips")
        );
        assert_eq!(
            ns.find_folder("root-d").await.unwrap(),
            FolderAddress::root_of(Root::Download)
        );
        assert!(ns.find_folder("trips").await.is_err());
    }

    #[tokio::test]
    async fn folder_literally_ending_with_marker_stays_reachable() {
        let (_base, ns) = namespace();
        stdfs::create_dir_all(ns.roots().upload().join("build-d")).unwrap();

        assert_eq!(
            ns.find_folder("build-d").await.unwrap(),
            FolderAddress::new(Root::Upload, "build-d")
        );
    }

    #[tokio::test]
    async fn literal_marker_folder_beats_nested_download_match() {
        let (_base, ns) = namespace();
        put(ns.roots().upload(), "build-d/upload.txt", b"u");
        put(ns.roots().download(), "old/build/download.txt", b"d");

        let listed = FolderAddress::new(Root::Upload, "build-d");
        assert!(ns.list_all_folders().await.contains(&listed));
        assert_eq!(ns.find_folder(&listed.to_string()).await.unwrap(), listed);
    }

    #[tokio::test]
    async fn list_folder_is_direct_children_only() {
        let (_base, ns) = namespace();
        put(ns.roots().upload(), "album/b.jpg", b"b");
        put(ns.roots().upload(), "album/a.jpg", b"a");
        put(ns.roots().upload(), "album/nested/c.jpg", b"c");
        put(ns.roots().upload(), "album/.x.jpg.part", b"partial");
        stdfs::create_dir_all(ns.roots().upload().join("empty")).unwrap();

        let album = ns.list_folder(&FolderAddress::new(Root::Upload, "album")).await.unwrap();
        let names: Vec<_> = album.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(names, ["album/a.jpg", "album/b.jpg"]);

        let empty = ns.list_folder(&FolderAddress::new(Root::Upload, "empty")).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn listings_span_both_roots() {
        let (_base, ns) = namespace();
        put(ns.roots().upload(), "b.txt", b"");
        put(ns.roots().upload(), "sub/c.txt", b"");
        put(ns.roots().download(), "a.txt", b"");

        let files: Vec<_> = ns
            .list_all_files()
            .await
            .into_iter()
            .map(|f| f.rel_path)
            .collect();
        assert_eq!(files, ["a.txt", "b.txt", "sub/c.txt"]);

        let folders = ns.list_all_folders().await;
        assert_eq!(
            folders,
            vec![
                FolderAddress::root_of(Root::Upload),
                FolderAddress::new(Root::Upload, "sub"),
                FolderAddress::root_of(Root::Download),
            ]
        );
    }

    #[tokio::test]
    async fn missing_root_does_not_blind_the_other() {
        let (_base, ns) = namespace();
        put(ns.roots().upload(), "keep.txt", b"");
        stdfs::remove_dir_all(ns.roots().download()).unwrap();

        let files = ns.list_all_files().await;
        assert_eq!(files.len(), 1);
        let folders = ns.list_all_folders().await;
        assert_eq!(folders.len(), 2);
        assert!(ns.find_file("keep.txt").await.is_ok());
    }
}
