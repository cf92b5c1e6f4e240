// Property-based tests for coverage, range detection, cleaning, and merge.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::BTreeSet;

use proptest::prelude::*;
use mushaf_recon::clean::{OcrCleaner, TextCleaner};
use mushaf_recon::coverage;
use mushaf_recon::index;
use mushaf_recon::merge::merge;
use mushaf_recon::ranges::find_ranges;
use mushaf_recon::{DatasetKey, SourceDataset, VerseKey};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn config_64() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(64),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn universe() -> Vec<VerseKey> {
    index::all_keys().collect()
}

/// Arbitrary subset of the verse universe, as indices.
fn arb_key_indices() -> impl Strategy<Value = BTreeSet<usize>> {
    prop::collection::btree_set(0..index::TOTAL_VERSES, 1..300)
}

/// Translation text: a small vocabulary so runs actually occur.
fn arb_translation() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => Just("Elif Lam Mim.".to_string()),
        3 => Just("Ha Mim.".to_string()),
        2 => Just("".to_string()),
        2 => r"[a-z ]{1,8}",
    ]
}

/// `(ayah, text)` with ascending ayat and occasional gaps.
fn arb_verses() -> impl Strategy<Value = Vec<(u16, String)>> {
    prop::collection::vec((1u16..=2, arb_translation()), 0..60).prop_map(|steps| {
        let mut ayah = 0u16;
        steps
            .into_iter()
            .map(|(step, text)| {
                ayah += step;
                (ayah, text)
            })
            .collect()
    })
}

/// OCR-ish text: Turkish letters, digits, noise symbols, and line breaks.
fn arb_ocr_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"[a-zA-ZçğıöşüÇĞİÖŞÜ0-9 .,;:()\-\n#%&Sh]{0,240}",
        1 => any::<String>(),
    ]
}

fn arb_dataset(tag: &'static str) -> impl Strategy<Value = SourceDataset> {
    prop::collection::btree_set(0..200usize, 0..40).prop_map(move |idx| {
        let all = universe();
        idx.into_iter()
            .map(|i| (all[i], format!("{tag}{i}")))
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_64())]

    #[test]
    fn removing_a_key_decrements_found(indices in arb_key_indices(), pick in any::<prop::sample::Index>()) {
        let all = universe();
        let keys: BTreeSet<VerseKey> = indices.iter().map(|&i| all[i]).collect();
        let candidates: Vec<VerseKey> = keys.iter().copied().collect();
        let removed = *pick.get(&candidates);

        let before = coverage::check_keys(&keys);
        let mut fewer = keys.clone();
        fewer.remove(&removed);
        let after = coverage::check_keys(&fewer);

        prop_assert_eq!(after.found, before.found - 1);
        prop_assert_eq!(after.missing.len(), before.missing.len() + 1);
        let before_missing: BTreeSet<_> = before.missing.iter().copied().collect();
        let added: Vec<_> = after.missing.iter().filter(|k| !before_missing.contains(k)).collect();
        prop_assert_eq!(added, vec![&removed]);
    }

    #[test]
    fn found_plus_missing_is_universe(indices in arb_key_indices()) {
        let all = universe();
        let keys: BTreeSet<VerseKey> = indices.iter().map(|&i| all[i]).collect();
        let report = coverage::check_keys(&keys);
        prop_assert_eq!(report.found + report.missing.len(), index::TOTAL_VERSES);
    }
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn ranges_have_at_least_two_verses(verses in arb_verses()) {
        let input: Vec<(u16, &str)> = verses.iter().map(|(a, t)| (*a, t.as_str())).collect();
        for r in find_ranges(1, &input) {
            prop_assert!(r.verse_count >= 2);
            prop_assert_eq!(r.verse_count, r.end_verse - r.start_verse + 1);
        }
    }

    #[test]
    fn ranges_partition_identical_runs(verses in arb_verses()) {
        let input: Vec<(u16, &str)> = verses.iter().map(|(a, t)| (*a, t.as_str())).collect();
        let ranges = find_ranges(1, &input);

        // No overlaps, ascending.
        for w in ranges.windows(2) {
            prop_assert!(w[0].end_verse < w[1].start_verse);
        }

        // Every consecutive identical non-empty pair is inside exactly one range.
        for w in input.windows(2) {
            let ((a1, t1), (a2, t2)) = (w[0], w[1]);
            let identical = a2 == a1 + 1 && !t1.is_empty() && t1 == t2;
            let covering = ranges
                .iter()
                .filter(|r| r.start_verse <= a1 && a2 <= r.end_verse)
                .count();
            prop_assert_eq!(covering, usize::from(identical));
        }

        // Every verse inside a range carries the range's text.
        for r in &ranges {
            let texts: BTreeSet<&str> = input
                .iter()
                .filter(|(a, _)| (r.start_verse..=r.end_verse).contains(a))
                .map(|(_, t)| *t)
                .collect();
            prop_assert_eq!(texts.len(), 1);
        }
    }

    #[test]
    fn ranges_are_deterministic(verses in arb_verses()) {
        let input: Vec<(u16, &str)> = verses.iter().map(|(a, t)| (*a, t.as_str())).collect();
        prop_assert_eq!(find_ranges(4, &input), find_ranges(4, &input));
    }
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn cleaning_is_idempotent(text in arb_ocr_text()) {
        let cleaner = OcrCleaner::default();
        let once = cleaner.clean(&text);
        prop_assert_eq!(cleaner.clean(&once), once);
    }

    #[test]
    fn cleaning_never_grows(text in arb_ocr_text()) {
        let cleaner = OcrCleaner::default();
        prop_assert!(cleaner.clean(&text).len() <= text.len());
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn merge_keeps_exactly_the_union(
        primary in arb_dataset("p"),
        secondary in arb_dataset("s"),
        prefer_idx in prop::collection::btree_set(0..200usize, 0..20),
    ) {
        let all = universe();
        let prefer: BTreeSet<DatasetKey> = prefer_idx.iter().map(|&i| DatasetKey::Verse(all[i])).collect();
        let outcome = merge(&primary, &secondary, &prefer, None).unwrap();

        let union: BTreeSet<DatasetKey> = primary.entries.keys().chain(secondary.entries.keys()).copied().collect();
        let merged: BTreeSet<DatasetKey> = outcome.dataset.entries.keys().copied().collect();
        prop_assert_eq!(merged, union);

        for (key, entry) in &outcome.dataset.entries {
            let expected = if prefer.contains(key) && secondary.entries.contains_key(key) {
                &secondary.entries[key]
            } else if let Some(p) = primary.entries.get(key) {
                p
            } else {
                &secondary.entries[key]
            };
            prop_assert_eq!(entry, expected);
        }

        let s = &outcome.stats;
        prop_assert_eq!(s.from_primary + s.from_secondary_preferred + s.gap_filled, outcome.dataset.len());
    }
}
