//! Main test module for dumpnav
//!
//! This module includes all test suites:
//! - Integration tests against dumps built on disk
//! - Property-based tests for date and search invariants

pub mod integration;
pub mod property;

#[cfg(test)]
mod edge_cases {
    use ::dumpnav::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    #[test]
    fn test_empty_dump() {
        let dump = TempDir::new().unwrap();
        let roots = Roots::new("/newage/NEWAGE", dump.path());

        let err = codec::find_snapshot(&FsLister, &DumpDate::new(2017, 1, 1, 0), &roots).unwrap_err();
        assert!(matches!(err, NavError::NoSnapshotFound { .. }));

        let snapshots = SequenceBuilder::new(&FsLister, &roots)
            .build(&DumpDate::new(2017, 1, 1, 0), &DumpDate::ZERO)
            .unwrap();
        // A dump without date directories is its own single leaf
        assert_eq!(snapshots, vec![dump.path().to_path_buf()]);
    }

    #[test]
    fn test_missing_dump_root() {
        let base = TempDir::new().unwrap();
        let roots = Roots::new("/newage/NEWAGE", base.path().join("absent"));

        // The search only ends early
        let found = codec::encode_search(&FsLister, &DumpDate::new(2017, 1, 1, 0), &roots);
        assert_eq!(found, roots.dump_root());

        // The sequence cannot be built
        let err = SequenceBuilder::new(&FsLister, &roots)
            .build(&DumpDate::new(2017, 1, 1, 0), &DumpDate::ZERO)
            .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_reserved_names_in_dump() {
        let dump = TempDir::new().unwrap();
        for name in ["2017/0415/0036/NEWAGE", "current/NEWAGE", "first/NEWAGE", "lost+found"] {
            fs::create_dir_all(dump.path().join(name)).unwrap();
        }
        let roots = Roots::new("/newage/NEWAGE", dump.path());

        let found = codec::find_snapshot(&FsLister, &DumpDate::new(2018, 1, 1, 0), &roots).unwrap();
        assert_eq!(found, dump.path().join("2017/0415/0036"));

        let suffix = codec::snapshot_suffix(&dump.path().join("current/NEWAGE/etc/passwd"), &roots).unwrap();
        assert_eq!(suffix, PathBuf::from("NEWAGE/etc/passwd"));
    }

    #[test]
    fn test_unicode_file_history() {
        let dump = TempDir::new().unwrap();
        let suffix = Path::new("NEWAGE").join("notas-ñandú.txt");
        let mut snapshots = Vec::new();
        for (date, content) in [("2017/0415/0036", "¿qué?\n"), ("2017/0416/0036", "¿qué?\n¡nada!\n")] {
            let root = dump.path().join(date);
            fs::create_dir_all(root.join("NEWAGE")).unwrap();
            fs::write(root.join(&suffix), content).unwrap();
            snapshots.push(root);
        }

        let differ = SimilarDiffer::default();
        let events = History::new(&differ, HistoryOptions::default()).events(&snapshots, &suffix);
        assert_eq!(events.len(), 2);
        match &events[1] {
            Event::Diff { hunks, .. } => {
                assert_eq!(hunks.len(), 1);
                assert_eq!(hunks[0].lines, vec!["¡nada!"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
