//! Configuration values shared by the sequence builder and the change engine
//!
//! These are plain immutable values. They are built once, usually from the
//! command line, and passed explicitly to [`SequenceBuilder`](crate::SequenceBuilder)
//! and [`History`](crate::History).
//!
//! ## Examples
//!
//! ```rust
//! use dumpnav::types::{DiffUnit, Granularity, HistoryOptions};
//!
//! let granularity = Granularity {
//!     daily: true,
//!     ..Default::default()
//! };
//! assert!(granularity.any());
//!
//! let options = HistoryOptions {
//!     changes_only: true,
//!     ..Default::default()
//! };
//! assert_eq!(options.diff_unit, DiffUnit::Lines);
//! ```

use crate::date::DumpDate;
use serde::{Deserialize, Serialize};

/// Calendar units keeping at most one snapshot each
///
/// Enabled filters combine: a snapshot is dropped when it shares the field of
/// any enabled unit with the previously retained snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Granularity {
    /// One snapshot per years value
    pub yearly: bool,
    /// One snapshot per months value
    pub monthly: bool,
    /// One snapshot per days value
    pub daily: bool,
    /// One snapshot per hours value
    pub hourly: bool,
}

impl Granularity {
    /// Only the hourly filter
    pub fn hourly() -> Self {
        Self {
            hourly: true,
            ..Default::default()
        }
    }

    /// Whether any filter is enabled
    pub fn any(&self) -> bool {
        self.yearly || self.monthly || self.daily || self.hourly
    }

    /// Whether `candidate` duplicates `retained` for some enabled unit
    pub fn suppresses(&self, candidate: &DumpDate, retained: &DumpDate) -> bool {
        (self.yearly && candidate.same_year(retained))
            || (self.monthly && candidate.same_month(retained))
            || (self.daily && candidate.same_day(retained))
            || (self.hourly && candidate.same_hour(retained))
    }
}

/// Span granularity for textual diffs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffUnit {
    /// Whole lines
    #[default]
    Lines,
    /// Words and the whitespace between them
    Words,
    /// Single characters
    Chars,
}

/// Options for replaying the history of one path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryOptions {
    /// Report content changes as `write` events, never as diffs
    pub changes_only: bool,
    /// Diff even when the content looks binary
    pub force_text: bool,
    /// Attach directory listings to create and write events
    pub verbose: bool,
    /// Span granularity handed to the differ
    pub diff_unit: DiffUnit,
}
