//! Ordered snapshot sequences
//!
//! [`SequenceBuilder`] walks the dump depth first and returns the snapshot
//! roots dated between a lower and an upper bound, thinned out by a
//! [`Granularity`]. The walk uses an explicit worklist; subtrees whose
//! partially decoded date is already before the lower bound are skipped
//! without being listed (see [`DumpDate::is_before_sparse`]).
//!
//! Name order of the zero-padded date directories is taken as chronological
//! order, so the result is chronological as long as the dump is laid out that
//! way.
//!
//! ```rust
//! use dumpnav::{DumpDate, Granularity, MemoryLister, Roots, SequenceBuilder};
//! use std::path::PathBuf;
//!
//! let roots = Roots::new("/newage/NEWAGE", "/dump");
//! let mut tree = MemoryLister::new();
//! tree.insert("/dump/2017/0415/0000/NEWAGE");
//! tree.insert("/dump/2017/0415/1200/NEWAGE");
//! tree.insert("/dump/2017/0416/0000/NEWAGE");
//!
//! let snapshots = SequenceBuilder::new(&tree, &roots)
//!     .granularity(Granularity { daily: true, ..Default::default() })
//!     .build(&DumpDate::new(2017, 12, 31, 0), &DumpDate::ZERO)
//!     .unwrap();
//!
//! assert_eq!(snapshots, vec![
//!     PathBuf::from("/dump/2017/0415/0000"),
//!     PathBuf::from("/dump/2017/0416/0000"),
//! ]);
//! ```

use crate::codec;
use crate::date::DumpDate;
use crate::error::Result;
use crate::listing::DirLister;
use crate::roots::Roots;
use crate::types::Granularity;
use std::path::PathBuf;
use tracing::{debug, trace};

/// Depth of the year / month-day / hour hierarchy
const DATE_DEPTH: usize = 3;

/// Builds the list of snapshots a history is replayed over
#[derive(Debug)]
pub struct SequenceBuilder<'a, L: DirLister + ?Sized> {
    lister: &'a L,
    roots: &'a Roots,
    granularity: Granularity,
}

impl<'a, L: DirLister + ?Sized> SequenceBuilder<'a, L> {
    /// Create a builder with no granularity filter
    pub fn new(lister: &'a L, roots: &'a Roots) -> Self {
        Self {
            lister,
            roots,
            granularity: Granularity::default(),
        }
    }

    /// Set the granularity filters
    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Snapshot roots dated within `[lower, upper]`, in traversal order
    ///
    /// # Errors
    ///
    /// Any directory that cannot be listed aborts the build, since a partial
    /// sequence would silently skip history.
    pub fn build(&self, upper: &DumpDate, lower: &DumpDate) -> Result<Vec<PathBuf>> {
        let leaves = self.collect_leaves(lower)?;
        debug!("{} snapshot leaves under {}", leaves.len(), self.roots.dump_root().display());

        let mut retained: Vec<PathBuf> = Vec::new();
        let mut last: Option<DumpDate> = None;
        for leaf in leaves {
            let date = codec::decode(&leaf, self.roots)?;
            if date.is_after(upper) || date.is_before(lower) {
                trace!("{} ({}) out of bounds", leaf.display(), date);
                continue;
            }
            if let Some(previous) = &last {
                if self.granularity.suppresses(&date, previous) {
                    trace!("{} ({}) filtered by granularity", leaf.display(), date);
                    continue;
                }
            }
            last = Some(date);
            retained.push(leaf);
        }

        debug!("{} snapshots in sequence", retained.len());
        Ok(retained)
    }

    /// Depth-first leaves of the date hierarchy
    ///
    /// A directory is a leaf when it has no numeric children or sits at the
    /// hour level.
    fn collect_leaves(&self, lower: &DumpDate) -> Result<Vec<PathBuf>> {
        let mut leaves = Vec::new();
        let mut worklist = vec![(self.roots.dump_root().to_path_buf(), 0usize)];

        while let Some((dir, depth)) = worklist.pop() {
            if depth == DATE_DEPTH {
                leaves.push(dir);
                continue;
            }

            let mut children = Vec::new();
            for name in self.lister.list(&dir)? {
                if name.parse::<i64>().is_err() {
                    continue;
                }
                let child = dir.join(&name);
                let partial = codec::decode(&child, self.roots)?;
                if partial.is_before_sparse(lower) {
                    trace!("pruning {} ({})", child.display(), partial);
                    // Still a numeric child: the parent is not a leaf
                    children.push(None);
                    continue;
                }
                children.push(Some(child));
            }

            if children.is_empty() {
                leaves.push(dir);
                continue;
            }
            // Reversed so that the smallest name is visited first
            for child in children.into_iter().rev().flatten() {
                worklist.push((child, depth + 1));
            }
        }

        Ok(leaves)
    }
}
