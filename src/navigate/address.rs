//! Folder addresses
//!
//! Folders are addressed internally by a tagged `{root, path}` pair. The
//! string form exists only at the user boundary: a plain path names a folder
//! under the upload root, the same path followed by [`FOLDER_MARKER`] names
//! the matching folder under the download root.

use std::fmt;

use crate::storage::Root;

/// Suffix selecting the download root in a folder token
pub const FOLDER_MARKER: &str = "-d";

const UPLOAD_TAG: &str = "u";
const DOWNLOAD_TAG: &str = "d";

/// Literal tokens that name the root of a tree
const ROOT_MARKERS: [&str; 3] = ["", ".", "root"];

/// A folder inside one of the two roots
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderAddress {
    pub root: Root,
    /// Relative path with `/` separators, empty for the root itself
    pub path: String,
}

impl FolderAddress {
    pub fn new(root: Root, path: impl Into<String>) -> Self {
        Self {
            root,
            path: normalize(&path.into()),
        }
    }

    pub fn root_of(root: Root) -> Self {
        Self {
            root,
            path: String::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Parse a user token without touching the filesystem
    pub fn parse(token: &str) -> Self {
        let token = token.trim().trim_end_matches('/');
        match token.strip_suffix(FOLDER_MARKER) {
            Some(rest) => Self::from_marker_or_path(Root::Download, rest),
            None => Self::from_marker_or_path(Root::Upload, token),
        }
    }

    /// Every reading of a token, most specific first.
    ///
    /// A suffixed token may also be the literal name of an upload folder
    /// that happens to end with the marker, so it is tried there last.
    pub fn candidates(token: &str) -> Vec<Self> {
        let parsed = Self::parse(token);
        let mut candidates = vec![parsed.clone()];
        if parsed.root == Root::Download {
            let literal = Self::from_marker_or_path(Root::Upload, token.trim().trim_end_matches('/'));
            if !literal.is_root() {
                candidates.push(literal);
            }
        }
        candidates
    }

    /// Root-explicit form used in button payloads, e.g. `u:music/live`.
    /// Unlike the user token it never needs a filesystem lookup to decode.
    pub fn to_payload(&self) -> String {
        let tag = match self.root {
            Root::Upload => UPLOAD_TAG,
            Root::Download => DOWNLOAD_TAG,
        };
        format!("{tag}:{}", self.path)
    }

    /// Decode a payload produced by [`FolderAddress::to_payload`].
    pub fn from_payload(payload: &str) -> Option<Self> {
        let (tag, path) = payload.split_once(':')?;
        let root = match tag {
            UPLOAD_TAG => Root::Upload,
            DOWNLOAD_TAG => Root::Download,
            _ => return None,
        };
        Some(Self::new(root, path))
    }

    /// Human-readable label used in listings
    pub fn label(&self) -> String {
        if self.is_root() {
            format!("{}/", self.root.label())
        } else {
            format!("{}/{}", self.root.label(), self.path)
        }
    }

    fn from_marker_or_path(root: Root, raw: &str) -> Self {
        if ROOT_MARKERS.iter().any(|m| raw.eq_ignore_ascii_case(m)) {
            Self::root_of(root)
        } else {
            Self::new(root, raw)
        }
    }
}

/// Serializes back to the token a user would type
impl fmt::Display for FolderAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = if self.is_root() { "." } else { &self.path };
        match self.root {
            Root::Upload => f.write_str(base),
            Root::Download => write!(f, "{base}{FOLDER_MARKER}"),
        }
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}
