//! Utility functions for dumpnav
//!
//! Hashing, metadata extraction and lexical path handling used by the
//! snapshot loader and the command-line front ends.
//!
//! ## Categories of Utilities
//!
//! ### Hashing
//! - SHA-256 digest of in-memory data, hex encoded
//!
//! ### Metadata
//! - Size, permission bits, modification time and kind of an entry
//! - Unix permissions natively, a read-only approximation elsewhere
//!
//! ### Paths
//! - Lexical cleaning (`.` and `..` removal) without touching the filesystem
//! - Absolute paths relative to a working directory

use chrono::{DateTime, Local};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Hash arbitrary data using SHA-256
///
/// Returns the digest as a 64-character hexadecimal string. Equal digests
/// are taken as equal content.
///
/// # Example
///
/// ```rust,ignore
/// let hash = hash_data(b"Hello, world!");
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, hash_data(b"Hello, world!"));
/// ```
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Metadata of a file or directory as rendered in events
///
/// Only the fields that matter for change reporting are kept: two entries
/// with equal `EntryMeta` display the same metadata string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryMeta {
    /// Size in bytes
    pub size: u64,
    /// Unix-style permission bits
    pub permissions: u32,
    /// Last modification time
    pub modified: DateTime<Local>,
    /// Whether this is a directory
    pub is_directory: bool,
}

impl EntryMeta {
    /// Extract the reported fields from filesystem metadata
    pub fn from_metadata(metadata: &fs::Metadata) -> std::io::Result<Self> {
        Ok(Self {
            size: metadata.len(),
            permissions: get_permissions(metadata),
            modified: DateTime::<Local>::from(metadata.modified()?),
            is_directory: metadata.is_dir(),
        })
    }
}

impl fmt::Display for EntryMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:#o} {} {}",
            self.size,
            self.permissions,
            self.modified.format("%Y-%m-%d %H:%M:%S%.9f %z"),
            if self.is_directory { "d" } else { "f" }
        )
    }
}

/// Get Unix permissions from metadata
#[cfg(unix)]
fn get_permissions(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

/// Approximate Unix permissions from metadata
#[cfg(not(unix))]
fn get_permissions(metadata: &fs::Metadata) -> u32 {
    let base = if metadata.is_dir() { 0o555 } else { 0o444 };
    if metadata.permissions().readonly() {
        base
    } else {
        base | 0o200
    }
}

/// Lexically clean a path
///
/// Removes `.` components and resolves `..` against the preceding component,
/// never climbing above the root of an absolute path. Symbolic links are not
/// consulted.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Absolute, cleaned form of `path` taken relative to `cwd`
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        clean_path(path)
    } else {
        clean_path(&cwd.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_data() {
        let hash = hash_data(b"hello");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_data(b"hello"));
        assert_ne!(hash, hash_data(b"hello\n"));
    }

    #[test]
    fn test_entry_meta_display() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "12345").unwrap();

        let meta = EntryMeta::from_metadata(&fs::metadata(&file).unwrap()).unwrap();
        assert_eq!(meta.size, 5);
        assert!(!meta.is_directory);
        let rendered = meta.to_string();
        assert!(rendered.starts_with("5 0o"));
        assert!(rendered.ends_with(" f"));

        let dir_meta = EntryMeta::from_metadata(&fs::metadata(dir.path()).unwrap()).unwrap();
        assert!(dir_meta.to_string().ends_with(" d"));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/a/./b/../c/")), PathBuf::from("/a/c"));
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(clean_path(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_absolutize() {
        let cwd = Path::new("/newage/NEWAGE/src");
        assert_eq!(absolutize(Path::new("../doc/x"), cwd), PathBuf::from("/newage/NEWAGE/doc/x"));
        assert_eq!(absolutize(Path::new("/etc//passwd"), cwd), PathBuf::from("/etc/passwd"));
    }
}
