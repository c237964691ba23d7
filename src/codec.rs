//! Mapping between snapshot paths and dates
//!
//! A snapshot lives at `<dump root>/YYYY/MMDD/hhmm`, and mirrors the live tree
//! under a directory named after the live root (the boundary name). This
//! module is the only place that knows about the packed `MMDD` and `hhmm`
//! encodings; everything else handles decomposed [`DumpDate`] fields.
//!
//! ## Decoding
//!
//! [`decode`] is lenient about depth and strict about content: missing
//! segments read as zero and the boundary name ends the date prefix early,
//! but any other non-numeric segment in a date position is an error.
//!
//! ## Searching
//!
//! [`encode_search`] descends year, month-day and hour levels, each time taking
//! the largest numeric entry not exceeding the target
//! ([`biggest_smaller_eq`]). It returns whatever prefix it reached, so a result
//! equal to the dump root means nothing was found; [`find_snapshot`] turns that
//! case into an error.
//!
//! ```rust
//! use dumpnav::{codec, DumpDate, MemoryLister, Roots};
//! use std::path::Path;
//!
//! let roots = Roots::new("/newage/NEWAGE", "/dump");
//! let mut tree = MemoryLister::new();
//! tree.insert("/dump/2017/0415/0036/NEWAGE");
//! tree.insert("/dump/2017/0415/1200/NEWAGE");
//!
//! let found = codec::find_snapshot(&tree, &DumpDate::new(2017, 4, 15, 1100), &roots).unwrap();
//! assert_eq!(found, Path::new("/dump/2017/0415/0036"));
//! assert_eq!(codec::decode(&found, &roots).unwrap(), DumpDate::new(2017, 4, 15, 36));
//! ```

use crate::date::DumpDate;
use crate::error::{DateField, NavError, Result};
use crate::listing::DirLister;
use crate::roots::Roots;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

/// Names that can sit among date directories without being dates
pub const RESERVED_NAMES: [&str; 4] = ["current", "current_chk", "first", "lost+found"];

const DATE_FIELDS: [DateField; 3] = [DateField::Year, DateField::MonthDay, DateField::Hour];

/// Whether `name` is one of the reserved non-date names
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Plain name components of `path` below `root`
fn segments_below(path: &Path, root: &Path) -> Result<Vec<String>> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| NavError::PathOutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;
    Ok(relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect())
}

/// Interpret a dump path as a date
///
/// Up to three leading segments below the dump root are read as year,
/// `month * 100 + day` and `hour * 100 + minute`. Absent segments are zero.
///
/// # Errors
///
/// - [`NavError::PathOutsideRoot`] if `path` is not under the dump root
/// - [`NavError::MalformedSnapshotName`] if a date position holds anything
///   but a number or the boundary name
pub fn decode(path: &Path, roots: &Roots) -> Result<DumpDate> {
    let segments = segments_below(path, roots.dump_root())?;

    let mut values = [0i64; 3];
    for ((value, field), segment) in values.iter_mut().zip(DATE_FIELDS).zip(&segments) {
        match segment.parse::<i64>() {
            Ok(parsed) => *value = parsed,
            Err(_) if segment == roots.root_name() => break,
            Err(_) => {
                return Err(NavError::MalformedSnapshotName {
                    field,
                    segment: segment.clone(),
                    path: path.to_path_buf(),
                })
            }
        }
    }

    let [years, month_day, hours] = values;
    let date = DumpDate::new(years, month_day / 100, month_day % 100, hours);
    trace!("dump date {} for {}", date, path.display());
    Ok(date)
}

/// Largest numeric entry of `dir` not above `ceiling`, with its entry name
///
/// Entries are scanned in name order. Reserved names are skipped; the first
/// other non-numeric name stops the scan, since numeric names are expected to
/// sort before anything else.
fn nearest_entry<L: DirLister + ?Sized>(
    lister: &L,
    dir: &Path,
    ceiling: i64,
) -> Result<(i64, String)> {
    trace!("biggest entry <= {} in {}", ceiling, dir.display());
    let mut best: Option<(i64, String)> = None;

    for name in lister.list(dir)? {
        if is_reserved(&name) {
            continue;
        }
        let Ok(value) = name.parse::<i64>() else {
            trace!("non numeric name {:?} ends the scan of {}", name, dir.display());
            break;
        };
        let better = best.as_ref().map_or(true, |(current, _)| value >= *current);
        if value >= 0 && value <= ceiling && better {
            best = Some((value, name));
        }
    }

    best.ok_or_else(|| NavError::NoQualifyingEntry {
        dir: dir.to_path_buf(),
        ceiling,
    })
}

/// Largest numeric entry name of `dir` that does not exceed `ceiling`
///
/// # Errors
///
/// - I/O errors if `dir` cannot be listed
/// - [`NavError::NoQualifyingEntry`] if no entry qualifies
pub fn biggest_smaller_eq<L: DirLister + ?Sized>(
    lister: &L,
    dir: &Path,
    ceiling: i64,
) -> Result<i64> {
    nearest_entry(lister, dir, ceiling).map(|(value, _)| value)
}

/// Path of the snapshot closest to, but not after, `target`
///
/// Descends at most three levels and stops at the first level with nothing
/// suitable, returning the prefix reached. A result equal to the dump root
/// means no snapshot was found.
pub fn encode_search<L: DirLister + ?Sized>(
    lister: &L,
    target: &DumpDate,
    roots: &Roots,
) -> PathBuf {
    let ceilings = [
        target.years(),
        target.months().saturating_mul(100).saturating_add(target.days()),
        target.hours(),
    ];

    let mut partial = roots.dump_root().to_path_buf();
    for ceiling in ceilings {
        match nearest_entry(lister, &partial, ceiling) {
            Ok((_, name)) => partial.push(name),
            Err(e) => {
                debug!("search for {} stops at {}: {}", target, partial.display(), e);
                break;
            }
        }
    }

    debug!("nearest snapshot for {} is {}", target, partial.display());
    partial
}

/// Like [`encode_search`], failing when nothing below the dump root matched
pub fn find_snapshot<L: DirLister + ?Sized>(
    lister: &L,
    target: &DumpDate,
    roots: &Roots,
) -> Result<PathBuf> {
    let found = encode_search(lister, target, roots);
    if found == roots.dump_root() {
        return Err(NavError::NoSnapshotFound {
            root: roots.dump_root().to_path_buf(),
        });
    }
    Ok(found)
}

/// Part of `path` relative to the root of whichever snapshot holds it
///
/// For a live path this is the boundary name followed by the path below the
/// live root. For a dump path the dump root and its leading date (or
/// reserved) segments are removed.
pub fn snapshot_suffix(path: &Path, roots: &Roots) -> Result<PathBuf> {
    if roots.is_dump(path) {
        let segments = segments_below(path, roots.dump_root())?;
        let date_len = segments
            .iter()
            .take(DATE_FIELDS.len())
            .take_while(|s| s.parse::<i64>().is_ok() || is_reserved(s))
            .count();
        return Ok(segments[date_len..].iter().collect());
    }

    let below_live = segments_below(path, roots.main_root())?;
    let mut suffix = PathBuf::from(roots.root_name());
    suffix.extend(below_live);
    Ok(suffix)
}
