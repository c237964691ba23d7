//! Integration tests against dumps built on disk
//!
//! Covers the nearest snapshot search over a dense archive, root resolution
//! from candidate lists and full history replays through the real
//! filesystem lister.

use ::dumpnav::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::info;

/// A dump with one snapshot every 15 minutes
pub struct ArchiveHarness {
    pub dir: TempDir,
    pub roots: Roots,
}

impl ArchiveHarness {
    /// Years 2000 to 2004, August to October, days 5 to 11, from 09:00 to
    /// 10:30 every quarter hour
    pub fn quarter_hourly() -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let dump = dir.path().join("dump");
        for year in 2000..2005 {
            for month in 8..11 {
                for day in 5..12 {
                    for hour in [900, 1000] {
                        for minute in [0, 15, 30] {
                            let snapshot = format!("{:04}/{:02}{:02}/{:04}/bin", year, month, day, hour + minute);
                            fs::create_dir_all(dump.join(snapshot))?;
                        }
                    }
                }
            }
        }
        let roots = Roots::new("/bin", &dump);
        info!("archive at {}", dump.display());
        Ok(Self { dir, roots })
    }

    pub fn dump(&self) -> &Path {
        self.roots.dump_root()
    }
}

#[test]
fn test_find_nearest_quarter_hour() -> anyhow::Result<()> {
    let archive = ArchiveHarness::quarter_hourly()?;

    let found = codec::find_snapshot(&FsLister, &DumpDate::new(2003, 8, 10, 1100), &archive.roots)?;
    assert_eq!(found, archive.dump().join("2003/0810/1030"));

    let found = codec::find_snapshot(&FsLister, &DumpDate::new(2003, 8, 10, 1014), &archive.roots)?;
    assert_eq!(found, archive.dump().join("2003/0810/1000"));

    // Before the first snapshot of the day the search stops at the day
    let found = codec::encode_search(&FsLister, &DumpDate::new(2003, 8, 10, 800), &archive.roots);
    assert_eq!(found, archive.dump().join("2003/0810"));

    // Past the end of the archive the last snapshot wins
    let found = codec::find_snapshot(&FsLister, &DumpDate::new(2030, 12, 31, 2359), &archive.roots)?;
    assert_eq!(found, archive.dump().join("2004/1011/1030"));
    Ok(())
}

#[test]
fn test_found_snapshot_never_after_target() -> anyhow::Result<()> {
    let archive = ArchiveHarness::quarter_hourly()?;

    for target in [
        DumpDate::new(2001, 9, 7, 945),
        DumpDate::new(2002, 12, 31, 2359),
        DumpDate::new(2004, 8, 5, 900),
        DumpDate::new(2000, 10, 11, 1029),
    ] {
        let found = codec::find_snapshot(&FsLister, &target, &archive.roots)?;
        let date = codec::decode(&found, &archive.roots)?;
        assert!(!date.is_after(&target), "{} after {}", date, target);
    }
    Ok(())
}

#[test]
fn test_biggest_smaller_eq_on_disk() -> anyhow::Result<()> {
    let archive = ArchiveHarness::quarter_hourly()?;
    let day = archive.dump().join("2002/0907");

    assert_eq!(codec::biggest_smaller_eq(&FsLister, &day, 959)?, 930);
    assert_eq!(codec::biggest_smaller_eq(&FsLister, &day, 5000)?, 1030);
    let err = codec::biggest_smaller_eq(&FsLister, &day, 899).unwrap_err();
    assert!(matches!(err, NavError::NoQualifyingEntry { ceiling: 899, .. }));
    Ok(())
}

#[test]
fn test_sequence_over_archive() -> anyhow::Result<()> {
    let archive = ArchiveHarness::quarter_hourly()?;

    let all = SequenceBuilder::new(&FsLister, &archive.roots)
        .build(&DumpDate::new(2000, 8, 5, 1030), &DumpDate::ZERO)?;
    assert_eq!(all.len(), 6);

    let daily = SequenceBuilder::new(&FsLister, &archive.roots)
        .granularity(Granularity {
            daily: true,
            ..Default::default()
        })
        .build(&DumpDate::new(2000, 10, 11, 2359), &DumpDate::new(2000, 10, 1, 0))?;
    let expected: Vec<PathBuf> = (5..12)
        .map(|day| archive.dump().join(format!("2000/10{:02}/0900", day)))
        .collect();
    assert_eq!(daily, expected);

    let yearly = SequenceBuilder::new(&FsLister, &archive.roots)
        .granularity(Granularity {
            yearly: true,
            ..Default::default()
        })
        .build(&DumpDate::new(2100, 1, 1, 0), &DumpDate::ZERO)?;
    assert_eq!(yearly.len(), 5);
    assert_eq!(yearly[4], archive.dump().join("2004/0805/0900"));
    Ok(())
}

#[test]
fn test_roots_from_candidate_lists() -> anyhow::Result<()> {
    let base = TempDir::new()?;
    let live = base.path().join("bin");
    let dump = base.path().join("etc");
    fs::create_dir_all(&live)?;
    fs::create_dir_all(&dump)?;

    let main_list = format!("/adfadf:/2rsdfewr2/asf3qer:{}", live.display());
    let dump_list = format!("/adf13123adf:/sdfsd/asf3qer:{}", dump.display());
    let roots = Roots::from_lookup(|var| match var {
        "MAINROOT" => Some(main_list.clone()),
        "DUMPROOT" => Some(dump_list.clone()),
        _ => None,
    });
    assert_eq!(roots.main_root(), live);
    assert_eq!(roots.dump_root(), dump);
    assert_eq!(roots.root_name(), "bin");

    let date = codec::decode(&dump.join("2017/0415/0036/bin"), &roots)?;
    assert_eq!(date, DumpDate::new(2017, 4, 15, 36));
    assert!(codec::decode(&dump.join("2017/patatilla"), &roots).is_err());
    assert!(codec::decode(Path::new("/blabla/2017/0415/0036"), &roots).is_err());

    // Nothing exists: built-in defaults
    let roots = Roots::from_lookup(|_| Some("/adfadf:/sdfsd".to_string()));
    assert_eq!(roots.main_root(), Path::new(roots::DEFAULT_ROOT));
    assert_eq!(roots.dump_root(), Path::new(roots::DEFAULT_DUMP));
    assert_eq!(roots.root_name(), "NEWAGE");
    Ok(())
}

#[test]
fn test_directory_history() -> anyhow::Result<()> {
    let base = TempDir::new()?;
    let dump = base.path().join("dump");
    let roots = Roots::new(base.path().join("NEWAGE"), &dump);

    let days = ["2017/0415/0036", "2017/0416/0036", "2017/0417/0036"];
    for day in days {
        fs::create_dir_all(dump.join(day).join("NEWAGE/src"))?;
    }
    fs::write(dump.join(days[0]).join("NEWAGE/src/a.c"), "int a;\n")?;
    fs::write(dump.join(days[1]).join("NEWAGE/src/a.c"), "int a;\n")?;
    fs::write(dump.join(days[1]).join("NEWAGE/src/b.c"), "int b;\n")?;
    fs::write(dump.join(days[2]).join("NEWAGE/src/b.c"), "int b;\n")?;

    let path = dump.join(days[2]).join("NEWAGE/src");
    let nav = Navigator::new(&FsLister, &roots);
    let upper = nav.target_date(&path, chrono::Local::now().naive_local());
    let snapshots = SequenceBuilder::new(&FsLister, &roots).build(&upper, &DumpDate::ZERO)?;
    assert_eq!(snapshots.len(), 3);

    let suffix = codec::snapshot_suffix(&path, &roots)?;
    let options = HistoryOptions {
        changes_only: true,
        ..Default::default()
    };
    let differ = SimilarDiffer::default();
    let mut events = Vec::new();
    History::new(&differ, options).replay(&snapshots, &suffix, |event| {
        events.push(event);
        Ok(())
    })?;

    // Adding and removing entries rewrites the directory
    let tags: Vec<&str> = events
        .iter()
        .map(|e| match e {
            Event::Create { .. } => "create",
            Event::Write { .. } => "write",
            _ => "other",
        })
        .collect();
    assert_eq!(tags, vec!["create", "write", "write"]);
    Ok(())
}
