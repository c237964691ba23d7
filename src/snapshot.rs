//! Content and metadata signatures of snapshot entries
//!
//! A [`Signature`] is what the change engine compares between two snapshots:
//! the entry's text, a SHA-256 digest of it and its rendered metadata. Regular
//! files contribute their bytes. Directories contribute a synthetic listing of
//! their immediate children, one line per child with its metadata, so a
//! directory "changes" when an entry is added, removed or touched.
//!
//! Signatures are built fresh for every comparison and never stored.

use crate::error::{NavError, Result};
use crate::utils::{self, EntryMeta};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// Replacement character left behind by lossy UTF-8 decoding
const REPLACEMENT: char = '\u{FFFD}';

/// Comparable view of one path inside one snapshot
#[derive(Debug, Clone)]
pub struct Signature {
    path: PathBuf,
    text: String,
    lines: Vec<String>,
    digest: String,
    meta: EntryMeta,
}

/// Errors that mean the entry is simply not there
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

impl Signature {
    /// Load the signature of `path`
    ///
    /// Returns `Ok(None)` when the path does not exist in this snapshot.
    ///
    /// # Errors
    ///
    /// Any other failure to stat, read or list the entry.
    pub fn load(path: &Path) -> Result<Option<Signature>> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if is_absent(&e) => {
                trace!("{} does not exist", path.display());
                return Ok(None);
            }
            Err(e) => return Err(NavError::io_at(path, e)),
        };
        let meta = EntryMeta::from_metadata(&metadata).map_err(|e| NavError::io_at(path, e))?;

        let (text, digest) = if metadata.is_dir() {
            let listing = list_children(path)?;
            let digest = utils::hash_data(listing.as_bytes());
            (listing, digest)
        } else {
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) if is_absent(&e) => return Ok(None),
                Err(e) => return Err(NavError::io_at(path, e)),
            };
            let digest = utils::hash_data(&bytes);
            (String::from_utf8_lossy(&bytes).into_owned(), digest)
        };

        let lines = text.split('\n').map(str::to_string).collect();
        trace!("loaded {} ({})", path.display(), &digest[..8]);
        Ok(Some(Signature {
            path: path.to_path_buf(),
            text,
            lines,
            digest,
            meta,
        }))
    }

    /// Path the signature was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content as text (lossy for non UTF-8 files)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content split on line breaks
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Hex SHA-256 of the content
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Reported metadata
    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    /// Whether this is a directory
    pub fn is_dir(&self) -> bool {
        self.meta.is_directory
    }

    /// Whether the content looks binary
    ///
    /// Content that did not decode as UTF-8 carries replacement characters.
    pub fn is_binary(&self) -> bool {
        self.text.contains(REPLACEMENT)
    }

    /// Same content digest as `other`
    pub fn has_eq_content(&self, other: &Signature) -> bool {
        self.digest == other.digest
    }
}

/// `<path> <metadata>`
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path.display(), self.meta)
    }
}

/// Synthetic listing of the immediate children of `dir`
fn list_children(dir: &Path) -> Result<String> {
    let mut listing = String::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let metadata = entry.metadata()?;
        let meta = EntryMeta::from_metadata(&metadata).map_err(|e| NavError::io_at(entry.path(), e))?;
        listing.push_str(&format!(
            "\t[]\t{} {}\n",
            entry.file_name().to_string_lossy(),
            meta
        ));
    }
    Ok(listing)
}
