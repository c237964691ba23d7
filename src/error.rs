//! Error types for the dumpnav library
//!
//! This module defines all error types that can occur while navigating a dump.
//! The variants follow the phases of a run: resolving roots, decoding snapshot
//! paths, searching the date hierarchy and reading snapshot contents.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Type alias for Results in the dumpnav library
pub type Result<T> = std::result::Result<T, NavError>;

/// Date-bearing position inside a snapshot path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    /// First segment, `YYYY`
    Year,
    /// Second segment, `MMDD`
    MonthDay,
    /// Third segment, `hhmm`
    Hour,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateField::Year => "year",
            DateField::MonthDay => "month",
            DateField::Hour => "hour",
        };
        f.write_str(name)
    }
}

/// Main error type for all dumpnav operations
#[derive(Debug, Error)]
pub enum NavError {
    /// I/O errors without a known path
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific path
    #[error("IO error on {path:?}: {source}")]
    IoAt {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Walk directory error from walkdir crate
    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Errors while serializing the event stream
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// None of the candidates of an environment list exists
    #[error("No existing path for {var} among [{candidates}]")]
    Config {
        /// Environment variable that was consulted
        var: String,
        /// The raw candidate list
        candidates: String,
    },

    /// A path was expected under a root but lies elsewhere
    #[error("Path {path:?} is not under root {root:?}")]
    PathOutsideRoot {
        /// Offending path
        path: PathBuf,
        /// Root the path should be under
        root: PathBuf,
    },

    /// A date position holds something that is neither a number nor the root name
    #[error("Bad {field} {segment:?} in snapshot path {path:?}")]
    MalformedSnapshotName {
        /// Which date position failed
        field: DateField,
        /// The segment text
        segment: String,
        /// Full path being decoded
        path: PathBuf,
    },

    /// No numeric entry of a directory is at most the ceiling
    #[error("No numeric entry in {dir:?} is at most {ceiling}")]
    NoQualifyingEntry {
        /// Directory that was scanned
        dir: PathBuf,
        /// Requested ceiling
        ceiling: i64,
    },

    /// The nearest-snapshot search did not get past the dump root
    #[error("Could not find a snapshot under {root:?}")]
    NoSnapshotFound {
        /// Dump root that was searched
        root: PathBuf,
    },

    /// Calendar arithmetic left the representable range
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Going back in time led to the same path
    #[error("Could not find an earlier copy of {path:?} in the dump")]
    NoEarlierCopy {
        /// Path that was looked up
        path: PathBuf,
    },
}

impl NavError {
    /// Attach a path to an I/O error
    pub fn io_at(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        NavError::IoAt {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Check if a caller can carry on with a fallback value
    ///
    /// An unresolvable environment list falls back to the built-in default and
    /// a failed nearest search only ends the descent early.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            NavError::Config { .. } | NavError::NoQualifyingEntry { .. }
        )
    }

    /// Check if this error comes from the filesystem
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            NavError::Io(_) | NavError::IoAt { .. } | NavError::WalkDir(_)
        )
    }
}
