//! Directory listing abstraction
//!
//! Both the nearest-snapshot search and the sequence builder only need the
//! sorted names of a directory's entries. [`DirLister`] captures that, so the
//! traversal logic runs the same against the real filesystem ([`FsLister`]) or
//! an in-memory tree ([`MemoryLister`]).

use crate::error::{NavError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// Source of directory listings
pub trait DirLister {
    /// Names of the immediate entries of `dir`, sorted by name
    fn list(&self, dir: &Path) -> Result<Vec<String>>;
}

/// Lists real directories
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirLister for FsLister {
    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        trace!("Listing {}", dir.display());
        let mut names = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

/// An in-memory directory tree
///
/// Every inserted path implicitly creates its ancestors, the way
/// `create_dir_all` would.
///
/// ```rust
/// use dumpnav::{DirLister, MemoryLister};
/// use std::path::Path;
///
/// let mut tree = MemoryLister::new();
/// tree.insert("/dump/2017/0415/0036/NEWAGE");
/// tree.insert("/dump/2017/0416/0036/NEWAGE");
///
/// let days = tree.list(Path::new("/dump/2017")).unwrap();
/// assert_eq!(days, vec!["0415", "0416"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLister {
    dirs: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl MemoryLister {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory and all of its ancestors
    pub fn insert(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.dirs.entry(path.to_path_buf()).or_default();

        let mut child = path;
        while let Some(parent) = child.parent() {
            if let Some(name) = child.file_name() {
                self.dirs
                    .entry(parent.to_path_buf())
                    .or_default()
                    .insert(name.to_string_lossy().into_owned());
            }
            child = parent;
        }
    }
}

impl DirLister for MemoryLister {
    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        self.dirs
            .get(dir)
            .map(|names| names.iter().cloned().collect())
            .ok_or_else(|| {
                NavError::io_at(dir, io::Error::new(io::ErrorKind::NotFound, "no such directory"))
            })
    }
}

impl<L: DirLister + ?Sized> DirLister for &L {
    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        (**self).list(dir)
    }
}
