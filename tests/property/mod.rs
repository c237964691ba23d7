//! Property-based testing for dumpnav
//!
//! Uses proptest to verify date arithmetic invariants and the guarantees of
//! the nearest snapshot search and the sequence filters over randomly
//! generated dump trees.

use ::dumpnav::{codec, DumpDate, Granularity, MemoryLister, Roots, SequenceBuilder};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;

/// Arbitrary dump dates with realistic field ranges
fn date_strategy() -> impl Strategy<Value = DumpDate> {
    (1990i64..2040, 1i64..=12, 1i64..=31, 0i64..24, 0i64..60)
        .prop_map(|(y, m, d, h, min)| DumpDate::new(y, m, d, h * 100 + min))
}

/// Small field offsets, possibly negative
fn delta_strategy() -> impl Strategy<Value = DumpDate> {
    (-5i64..5, -24i64..24, -60i64..60, -48i64..48).prop_map(|(y, m, d, h)| DumpDate::new(y, m, d, h))
}

/// Snapshot directory names of a random dump
fn snapshot_set_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        date_strategy().prop_map(|d| format!("{:04}/{:02}{:02}/{:04}", d.years(), d.months(), d.days(), d.hours())),
        1..40,
    )
}

fn tree_of(snapshots: &BTreeSet<String>) -> MemoryLister {
    let mut tree = MemoryLister::new();
    for snapshot in snapshots {
        tree.insert(Path::new("/dump").join(snapshot).join("NEWAGE"));
    }
    tree
}

fn roots() -> Roots {
    Roots::new("/newage/NEWAGE", "/dump")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_zero_is_additive_identity(d in date_strategy()) {
        prop_assert_eq!(d + DumpDate::ZERO, d);
        prop_assert_eq!(DumpDate::ZERO + d, d);
    }

    #[test]
    fn prop_addition_commutes_and_associates(
        a in delta_strategy(),
        b in delta_strategy(),
        c in delta_strategy(),
    ) {
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!((a + b) + c, a + (b + c));
    }

    #[test]
    fn prop_adding_hours_moves_forward(d in date_strategy(), steps in 1usize..200) {
        let hour = DumpDate::new(0, 0, 0, 1);
        let mut sum = d;
        for _ in 0..steps {
            sum = sum + hour;
            prop_assert!(sum.is_after(&d));
            prop_assert!(d.is_before(&sum));
        }
    }

    #[test]
    fn prop_sparse_before_is_safe(d in date_strategy(), bound in date_strategy(), level in 0usize..4) {
        // Forget the fields below `level`, as a partially decoded path would
        let partial = match level {
            0 => DumpDate::new(d.years(), 0, 0, 0),
            1 => DumpDate::new(d.years(), d.months(), 0, 0),
            2 => DumpDate::new(d.years(), d.months(), d.days(), 0),
            _ => d,
        };
        if partial.is_before_sparse(&bound) {
            prop_assert!(d.is_before(&bound));
        }
        // A zero hours field still reads as unknown
        if level == 3 && d.hours() != 0 {
            prop_assert_eq!(partial.is_before_sparse(&bound), d.is_before(&bound));
        }
    }

    #[test]
    fn prop_search_never_exceeds_target(snapshots in snapshot_set_strategy(), target in date_strategy()) {
        let tree = tree_of(&snapshots);
        let roots = roots();

        let found = codec::encode_search(&tree, &target, &roots);
        let date = codec::decode(&found, &roots).unwrap();
        prop_assert!(date.years() <= target.years());
        prop_assert!(date.months() * 100 + date.days() <= target.months() * 100 + target.days());
        prop_assert!(date.hours() <= target.hours());
    }

    #[test]
    fn prop_search_finds_exact_snapshot(snapshots in snapshot_set_strategy(), pick in any::<prop::sample::Index>()) {
        let tree = tree_of(&snapshots);
        let roots = roots();
        let Some(name) = snapshots.iter().nth(pick.index(snapshots.len())) else {
            return Ok(());
        };

        let target = codec::decode(&Path::new("/dump").join(name), &roots).unwrap();
        let found = codec::find_snapshot(&tree, &target, &roots).unwrap();
        prop_assert_eq!(found, Path::new("/dump").join(name));
    }

    #[test]
    fn prop_hourly_never_repeats_hour(snapshots in snapshot_set_strategy()) {
        let tree = tree_of(&snapshots);
        let roots = roots();

        let sequence = SequenceBuilder::new(&tree, &roots)
            .granularity(Granularity::hourly())
            .build(&DumpDate::new(9999, 12, 31, 2359), &DumpDate::ZERO)
            .unwrap();
        let dates: Vec<DumpDate> = sequence
            .iter()
            .map(|p| codec::decode(p, &roots).unwrap())
            .collect();
        for pair in dates.windows(2) {
            prop_assert!(!pair[0].same_hour(&pair[1]));
        }
    }

    #[test]
    fn prop_unfiltered_sequence_is_every_snapshot_in_bounds(
        snapshots in snapshot_set_strategy(),
        a in date_strategy(),
        b in date_strategy(),
    ) {
        let tree = tree_of(&snapshots);
        let roots = roots();
        let (lower, upper) = if a.is_after(&b) { (b, a) } else { (a, b) };

        let sequence = SequenceBuilder::new(&tree, &roots).build(&upper, &lower).unwrap();
        let expected: Vec<_> = snapshots
            .iter()
            .map(|name| Path::new("/dump").join(name))
            .filter(|p| {
                let d = codec::decode(p, &roots).unwrap();
                !d.is_after(&upper) && !d.is_before(&lower)
            })
            .collect();
        prop_assert_eq!(sequence, expected);
    }
}
