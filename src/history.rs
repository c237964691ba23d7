//! Change history of one path across a snapshot sequence
//!
//! [`History`] replays a chronological list of snapshot roots and reports how
//! the entry at a fixed suffix evolves from one snapshot to the next. The
//! comparison baseline is always the most recent snapshot in which the entry
//! existed, so a deletion followed by a recreation starts over with a fresh
//! `create` instead of diffing across the gap.
//!
//! Events are handed to a sink as they are produced:
//!
//! | Event    | When |
//! |----------|------|
//! | `create` | the entry becomes observable |
//! | `delete` | the entry existed and is gone in the next snapshot |
//! | `write`  | content changed and only changes are reported |
//! | `diff`   | content changed, rendered as hunks |
//! | `wstat`  | same content, different metadata |
//! | `skipped`| the entry could not be read in a snapshot |

use crate::diff::{format_diff, Hunk, SpanDiffer};
use crate::error::Result;
use crate::snapshot::Signature;
use crate::types::HistoryOptions;
use crate::utils::EntryMeta;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// One observation of the change engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum Event {
    /// The entry appeared
    Create {
        /// Path inside the snapshot
        path: PathBuf,
        /// Metadata at creation
        meta: EntryMeta,
        /// Directory listing, in verbose mode
        #[serde(skip_serializing_if = "Option::is_none")]
        listing: Option<String>,
    },
    /// The entry disappeared
    Delete {
        /// Last snapshot path holding the entry
        from: PathBuf,
        /// First snapshot path missing it
        to: PathBuf,
    },
    /// The content changed
    Write {
        /// Path inside the snapshot
        path: PathBuf,
        /// Metadata after the change
        meta: EntryMeta,
        /// Directory listing, in verbose mode
        #[serde(skip_serializing_if = "Option::is_none")]
        listing: Option<String>,
    },
    /// Only the metadata changed
    Wstat {
        /// Path inside the snapshot
        path: PathBuf,
        /// Metadata after the change
        meta: EntryMeta,
    },
    /// The content changed, with the changed regions
    Diff {
        /// Baseline path
        from: PathBuf,
        /// Changed path
        to: PathBuf,
        /// Changed regions in order
        hunks: Vec<Hunk>,
    },
    /// The entry could not be read in one snapshot
    Skipped {
        /// Path that failed
        path: PathBuf,
        /// Error message
        reason: String,
    },
}

impl Event {
    /// Whether this event reports a problem rather than a change
    pub fn is_skipped(&self) -> bool {
        matches!(self, Event::Skipped { .. })
    }

    fn created(sig: &Signature, verbose: bool) -> Self {
        Event::Create {
            path: sig.path().to_path_buf(),
            meta: sig.meta().clone(),
            listing: listing_of(sig, verbose),
        }
    }
}

fn listing_of(sig: &Signature, verbose: bool) -> Option<String> {
    (verbose && sig.is_dir()).then(|| sig.text().to_string())
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Create {
                path,
                meta,
                listing,
            } => {
                write!(f, "#create\t{} {}", path.display(), meta)?;
                if let Some(listing) = listing {
                    write!(f, "\n{}", listing.trim_end_matches('\n'))?;
                }
                Ok(())
            }
            Event::Delete { from, to } => {
                write!(f, "#delete\t{} -> {}", from.display(), to.display())
            }
            Event::Write {
                path,
                meta,
                listing,
            } => {
                write!(f, "#write\t{} {}", path.display(), meta)?;
                if let Some(listing) = listing {
                    write!(f, "\n{}", listing.trim_end_matches('\n'))?;
                }
                Ok(())
            }
            Event::Wstat { path, meta } => write!(f, "#wstat\t{} {}", path.display(), meta),
            Event::Diff { hunks, .. } => {
                let mut rendered = String::new();
                for hunk in hunks {
                    rendered.push('\n');
                    rendered.push_str(&hunk.to_string());
                }
                f.write_str(rendered.trim_end_matches('\n'))
            }
            Event::Skipped { path, reason } => write!(f, "{}: {}", path.display(), reason),
        }
    }
}

/// Change engine over a snapshot sequence
#[derive(Debug)]
pub struct History<'a, D: SpanDiffer + ?Sized> {
    differ: &'a D,
    options: HistoryOptions,
}

impl<'a, D: SpanDiffer + ?Sized> History<'a, D> {
    /// Create an engine using `differ` for content changes
    pub fn new(differ: &'a D, options: HistoryOptions) -> Self {
        Self { differ, options }
    }

    /// Replay `snapshots`, feeding each event to `sink`
    ///
    /// `suffix` is joined to every snapshot root to find the entry. Entries
    /// that fail to load are reported as [`Event::Skipped`] and leave the
    /// baseline untouched.
    ///
    /// # Errors
    ///
    /// Only errors returned by `sink` stop the replay.
    pub fn replay<F>(&self, snapshots: &[PathBuf], suffix: &Path, mut sink: F) -> Result<()>
    where
        F: FnMut(Event) -> Result<()>,
    {
        let mut baseline: Option<Signature> = None;
        let mut present = false;

        for root in snapshots {
            let path = root.join(suffix);
            let current = match Signature::load(&path) {
                Ok(current) => current,
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    sink(Event::Skipped {
                        path,
                        reason: e.to_string(),
                    })?;
                    continue;
                }
            };

            let current = match current {
                Some(current) => current,
                None => {
                    if present {
                        if let Some(previous) = &baseline {
                            sink(Event::Delete {
                                from: previous.path().to_path_buf(),
                                to: path,
                            })?;
                        }
                        present = false;
                    }
                    trace!("{} absent", root.display());
                    continue;
                }
            };

            let previous = match baseline.take() {
                Some(previous) if present => previous,
                _ => {
                    sink(Event::created(&current, self.options.verbose))?;
                    present = true;
                    baseline = Some(current);
                    continue;
                }
            };

            for event in self.compare(&previous, &current) {
                sink(event)?;
            }
            baseline = Some(current);
        }

        Ok(())
    }

    /// Collect the events of [`replay`](Self::replay)
    pub fn events(&self, snapshots: &[PathBuf], suffix: &Path) -> Vec<Event> {
        let mut events = Vec::new();
        // The sink never fails, so neither does the replay
        let _ = self.replay(snapshots, suffix, |event| {
            events.push(event);
            Ok(())
        });
        events
    }

    /// Events for one pair of consecutive existing signatures
    fn compare(&self, previous: &Signature, current: &Signature) -> Vec<Event> {
        let mut events = Vec::new();

        if previous.has_eq_content(current) {
            if previous.meta() != current.meta() {
                events.push(Event::Wstat {
                    path: current.path().to_path_buf(),
                    meta: current.meta().clone(),
                });
            }
            return events;
        }

        let changes_only = self.options.changes_only
            || (!self.options.force_text && (previous.is_binary() || current.is_binary()));
        let listing = listing_of(current, self.options.verbose);

        let hunks = if changes_only {
            Vec::new()
        } else {
            let spans = self.differ.spans(previous.text(), current.text());
            let hunks = format_diff(&spans, previous, current);
            debug!(
                "{} -> {}: {} hunks",
                previous.path().display(),
                current.path().display(),
                hunks.len()
            );
            hunks
        };

        // Digests differ, so a change with no visible hunk still gets a write
        if changes_only || listing.is_some() || hunks.is_empty() {
            events.push(Event::Write {
                path: current.path().to_path_buf(),
                meta: current.meta().clone(),
                listing,
            });
        }
        if !hunks.is_empty() {
            events.push(Event::Diff {
                from: previous.path().to_path_buf(),
                to: current.path().to_path_buf(),
                hunks,
            });
        }

        events
    }
}
