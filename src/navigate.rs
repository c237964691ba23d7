//! Date selection and path translation shared by the commands
//!
//! Both commands start from a path that may point into the live tree or into
//! some snapshot, pick a date, find the nearest snapshot for it and rebuild
//! the path inside that snapshot. [`Navigator`] bundles those steps.

use crate::codec;
use crate::date::DumpDate;
use crate::error::{NavError, Result};
use crate::listing::DirLister;
use crate::roots::Roots;
use crate::utils::clean_path;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Translates paths between the live tree and the snapshots of the dump
#[derive(Debug)]
pub struct Navigator<'a, L: DirLister + ?Sized> {
    lister: &'a L,
    roots: &'a Roots,
}

impl<'a, L: DirLister + ?Sized> Navigator<'a, L> {
    /// Create a navigator over the dump seen through `lister`
    pub fn new(lister: &'a L, roots: &'a Roots) -> Self {
        Self { lister, roots }
    }

    /// Roots this navigator works against
    pub fn roots(&self) -> &Roots {
        self.roots
    }

    /// Date a snapshot path belongs to, if it carries one
    fn dump_date(&self, path: &Path) -> Option<DumpDate> {
        if !self.roots.is_dump(path) {
            return None;
        }
        match codec::decode(path, self.roots) {
            Ok(date) if date.years() > 0 => {
                debug!("dump date {} for {}", date, path.display());
                Some(date)
            }
            Ok(_) => None,
            Err(e) => {
                debug!("{} carries no date: {}", path.display(), e);
                None
            }
        }
    }

    /// The date whose state `path` shows
    ///
    /// A snapshot path yields its own date, anything else the wall-clock time
    /// `now`.
    pub fn target_date(&self, path: &Path, now: NaiveDateTime) -> DumpDate {
        self.dump_date(path)
            .unwrap_or_else(|| DumpDate::from_datetime(&now))
    }

    /// [`target_date`](Self::target_date) moved by `delta`
    ///
    /// The shift goes through the calendar, so one day before the first of a
    /// month is the last day of the previous one. A snapshot date that is not a
    /// real calendar date is shifted field by field instead, with the hours of
    /// `delta` scaled to the packed `hhmm` form.
    ///
    /// # Errors
    ///
    /// [`NavError::DateOutOfRange`](crate::NavError::DateOutOfRange) if the
    /// shift leaves the calendar.
    pub fn shifted_date(&self, path: &Path, now: NaiveDateTime, delta: &DumpDate) -> Result<DumpDate> {
        let Some(date) = self.dump_date(path) else {
            return DumpDate::offset_datetime(now, delta);
        };
        match date.to_datetime() {
            Some(t) => DumpDate::offset_datetime(t, delta),
            None => {
                debug!("{} is not a calendar date, shifting fields", date);
                delta
                    .hours()
                    .checked_mul(100)
                    .map(|hours| DumpDate::new(delta.years(), delta.months(), delta.days(), hours))
                    .and_then(|packed| date.checked_add(&packed))
                    .ok_or_else(|| NavError::DateOutOfRange(format!("{} shifted by {}", date, delta)))
            }
        }
    }

    /// Where `path` lives in the snapshot nearest to, but not after, `date`
    ///
    /// # Errors
    ///
    /// - [`NavError::NoSnapshotFound`](crate::NavError::NoSnapshotFound) if no
    ///   snapshot qualifies
    /// - [`NavError::PathOutsideRoot`](crate::NavError::PathOutsideRoot) if
    ///   `path` is under neither root
    pub fn locate(&self, path: &Path, date: &DumpDate) -> Result<PathBuf> {
        let snapshot = codec::find_snapshot(self.lister, date, self.roots)?;
        let suffix = codec::snapshot_suffix(path, self.roots)?;
        let located = clean_path(&snapshot.join(suffix));
        debug!("{} at {} is {}", path.display(), date, located.display());
        Ok(located)
    }
}
