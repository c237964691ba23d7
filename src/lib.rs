//! # dumpnav - Navigate date-partitioned backup dumps
//!
//! A library for finding and comparing historical snapshots of a path in a
//! backup dump laid out as `<dump root>/YYYY/MMDD/hhmm/<root name>/...`.
//!
//! ## Overview
//!
//! A nightly (or more frequent) job copies a live tree into a new snapshot
//! directory named after the date and time of the copy. dumpnav lets you:
//! - Decode a snapshot path into a date and search for the snapshot nearest
//!   to, but not after, a given date
//! - Translate a path between the live tree and any snapshot
//! - Build the ordered list of snapshots between two dates, thinned out to at
//!   most one per year, month, day or hour
//! - Replay the history of one path across those snapshots as a stream of
//!   create, delete, write, metadata and diff events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dumpnav::{
//!     FsLister, History, HistoryOptions, Navigator, Roots, SequenceBuilder, SimilarDiffer,
//!     codec, DumpDate,
//! };
//! use std::path::Path;
//!
//! # fn main() -> dumpnav::Result<()> {
//! let roots = Roots::from_env();
//! let lister = FsLister;
//! let path = Path::new("/newage/NEWAGE/doc/notes.txt");
//!
//! // Where was this file yesterday?
//! let nav = Navigator::new(&lister, &roots);
//! let now = chrono::Local::now().naive_local();
//! let yesterday = nav.shifted_date(path, now, &DumpDate::new(0, 0, -1, 0))?;
//! println!("{}", nav.locate(path, &yesterday)?.display());
//!
//! // How did it change over time?
//! let snapshots = SequenceBuilder::new(&lister, &roots)
//!     .build(&nav.target_date(path, now), &DumpDate::ZERO)?;
//! let differ = SimilarDiffer::default();
//! let suffix = codec::snapshot_suffix(path, &roots)?;
//! for event in History::new(&differ, HistoryOptions::default()).events(&snapshots, &suffix) {
//!     println!("{}", event);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! ### Dump dates
//!
//! A [`DumpDate`] holds years, months, days and hours, the latter packed as
//! `hour * 100 + minute`. Dates are compared through an approximate monotonic
//! key and are never normalized, so they are good for ordering snapshots but
//! not for measuring time.
//!
//! ### Directory listing
//!
//! Every directory read of the search and sequence code goes through the
//! [`DirLister`] trait. [`FsLister`] reads the real filesystem and
//! [`MemoryLister`] serves an in-memory tree, which is how the algorithms are
//! tested without touching disk.
//!
//! ### Signatures
//!
//! The change engine compares [`Signature`]s: a file's bytes or a directory's
//! child listing, a SHA-256 digest and the entry metadata.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, NavError>`. Filesystem failures keep the
//! offending path, malformed snapshot names say which date field was bad.
//!
//! ## Module Organization
//!
//! - [`date`]: Dump dates and calendar conversion
//! - [`codec`]: Path to date decoding and nearest snapshot search
//! - [`sequence`]: Ordered, filtered snapshot lists
//! - [`history`]: The change engine and its events
//! - [`diff`]: Pluggable span diffing and hunk rendering
//! - [`navigate`]: Live and snapshot path translation
//! - [`types`]: Configuration values
//! - [`error`]: Error types and handling

// Public API modules
pub mod codec;
pub mod date;
pub mod diff;
pub mod error;
pub mod history;
pub mod listing;
pub mod navigate;
pub mod roots;
pub mod sequence;
pub mod snapshot;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use date::DumpDate;
pub use diff::{Hunk, SimilarDiffer, Span, SpanDiffer, SpanKind};
pub use error::{NavError, Result};
pub use history::{Event, History};
pub use listing::{DirLister, FsLister, MemoryLister};
pub use navigate::Navigator;
pub use roots::Roots;
pub use sequence::SequenceBuilder;
pub use snapshot::Signature;
pub use types::*;
