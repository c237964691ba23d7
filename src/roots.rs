//! Live and dump root resolution
//!
//! The live tree and the dump are located through two environment variables,
//! each holding a colon-separated list of candidate paths. The first candidate
//! that exists wins; when none does, a built-in default applies.

use crate::error::{NavError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable listing live root candidates
pub const MAIN_ROOT_VAR: &str = "MAINROOT";
/// Environment variable listing dump root candidates
pub const DUMP_ROOT_VAR: &str = "DUMPROOT";
/// Live root used when no candidate exists
pub const DEFAULT_ROOT: &str = "/newage/NEWAGE";
/// Boundary name used when the live root has no last component
pub const DEFAULT_ROOT_NAME: &str = "NEWAGE";
/// Dump root used when no candidate exists
pub const DEFAULT_DUMP: &str = "/dump";

/// The three values that anchor every dump lookup
///
/// `root_name` is the directory name that, inside each snapshot, marks where
/// the date hierarchy ends and the mirror of the live tree begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roots {
    main_root: PathBuf,
    dump_root: PathBuf,
    root_name: String,
}

impl Roots {
    /// Create roots from explicit paths, deriving the boundary name
    pub fn new(main_root: impl Into<PathBuf>, dump_root: impl Into<PathBuf>) -> Self {
        let main_root = main_root.into();
        let root_name = main_root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string());
        Self {
            main_root,
            dump_root: dump_root.into(),
            root_name,
        }
    }

    /// Override the boundary name
    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    /// Resolve roots from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve roots through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |var: &str, default: &str| {
            let Some(candidates) = lookup(var) else {
                debug!("{} unset, using {}", var, default);
                return PathBuf::from(default);
            };
            match first_existing(var, &candidates) {
                Ok(path) => path,
                Err(e) => {
                    warn!("{}, using {}", e, default);
                    PathBuf::from(default)
                }
            }
        };

        let roots = Self::new(
            resolve(MAIN_ROOT_VAR, DEFAULT_ROOT),
            resolve(DUMP_ROOT_VAR, DEFAULT_DUMP),
        );
        debug!(
            "mainRoot: {}, dumpRoot: {}, rootName: {}",
            roots.main_root.display(),
            roots.dump_root.display(),
            roots.root_name
        );
        roots
    }

    /// Root of the live tree
    pub fn main_root(&self) -> &Path {
        &self.main_root
    }

    /// Root of the date hierarchy
    pub fn dump_root(&self) -> &Path {
        &self.dump_root
    }

    /// Boundary directory name inside each snapshot
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Whether `path` lies in the dump
    pub fn is_dump(&self, path: &Path) -> bool {
        path.starts_with(&self.dump_root)
    }
}

/// First existing path of a colon-separated candidate list
pub fn first_existing(var: &str, candidates: &str) -> Result<PathBuf> {
    debug!("checking [{}]", candidates);
    for candidate in candidates.split(':').filter(|c| !c.is_empty()) {
        match std::fs::metadata(candidate) {
            Ok(_) => return Ok(PathBuf::from(candidate)),
            Err(e) => debug!("[{}] does not exist: {}", candidate, e),
        }
    }
    Err(NavError::Config {
        var: var.to_string(),
        candidates: candidates.to_string(),
    })
}
