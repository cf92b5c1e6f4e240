use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::warn;

use crate::error::ReconError;
use crate::index;
use crate::key::{DatasetKey, RawKey, VerseKey};
use crate::model::{CoverageReport, SourceDataset, SurahCoverage, SurahCoverageReport};

/// Round to two decimals, as reports show it.
fn percent(found: usize, total: usize) -> f64 {
    (found as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

/// Check raw `"surah:ayah"` keys against the verse universe.
///
/// Non-numeric keys fail with `MalformedKey`. Numeric keys outside the
/// universe (and surah-only keys) are returned as orphans and do not count
/// toward coverage.
pub fn check<I, S>(dataset_keys: I) -> Result<CoverageReport, ReconError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut valid = HashSet::new();
    let mut orphans = BTreeSet::new();

    for raw in dataset_keys {
        let raw = raw.as_ref();
        match RawKey::parse(raw)? {
            RawKey { surah, ayah: Some(ayah) } => match VerseKey::new(surah, ayah) {
                Ok(key) => {
                    valid.insert(key);
                }
                Err(_) => {
                    orphans.insert(raw.to_string());
                }
            },
            RawKey { ayah: None, .. } => {
                orphans.insert(raw.to_string());
            }
        }
    }

    Ok(build_report(|k| valid.contains(k), valid.len(), orphans.into_iter().collect()))
}

/// Check already-validated keys.
pub fn check_keys(keys: &BTreeSet<VerseKey>) -> CoverageReport {
    build_report(|k| keys.contains(k), keys.len(), Vec::new())
}

/// Verse coverage of a normalized dataset, carrying its orphans through.
pub fn check_dataset(dataset: &SourceDataset) -> CoverageReport {
    let keys: BTreeSet<VerseKey> = dataset.verse_keys().collect();
    let mut orphans = dataset.orphans.clone();
    orphans.extend(
        dataset
            .entries
            .keys()
            .filter(|k| matches!(k, DatasetKey::Surah(_)))
            .map(|k| k.to_string()),
    );
    build_report(|k| keys.contains(k), keys.len(), orphans)
}

fn build_report(
    contains: impl Fn(&VerseKey) -> bool,
    found: usize,
    orphans: Vec<String>,
) -> CoverageReport {
    // Walk the universe, not the dataset: absent surahs show up as gaps.
    let missing: Vec<VerseKey> = index::all_keys().filter(|k| !contains(k)).collect();

    if !orphans.is_empty() {
        warn!(count = orphans.len(), first = %orphans[0], "keys outside the verse universe");
    }

    CoverageReport {
        total_expected: index::TOTAL_VERSES,
        found,
        missing_count: missing.len(),
        missing,
        orphans,
        coverage_percent: percent(found, index::TOTAL_VERSES),
    }
}

/// Coverage for surah-scoped datasets (one entry per surah).
pub fn check_surahs(dataset: &SourceDataset) -> SurahCoverageReport {
    let present: BTreeSet<u8> = dataset
        .entries
        .keys()
        .filter_map(|k| match k {
            DatasetKey::Surah(s) => Some(*s),
            DatasetKey::Verse(_) => None,
        })
        .collect();
    let missing: Vec<u8> = index::surah_numbers().filter(|s| !present.contains(s)).collect();
    let total = index::SURAH_COUNT as usize;

    if !missing.is_empty() {
        warn!(missing = ?missing, "surahs without an entry");
    }

    SurahCoverageReport {
        total_expected: total,
        found: present.len(),
        missing,
        orphans: dataset.orphans.clone(),
        coverage_percent: percent(present.len(), total),
    }
}

/// Surahs whose verse coverage is partial (some but not all verses present).
pub fn per_surah(dataset: &SourceDataset) -> Vec<SurahCoverage> {
    let mut found: BTreeMap<u8, u16> = BTreeMap::new();
    for key in dataset.verse_keys() {
        *found.entry(key.surah()).or_insert(0) += 1;
    }

    found
        .into_iter()
        .filter_map(|(surah, found)| {
            let expected = index::expected_count(u32::from(surah)).ok()?;
            (found < expected).then_some(SurahCoverage { surah, expected, found })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fatiha_keys() -> Vec<String> {
        (1..=7).map(|a| format!("1:{a}")).collect()
    }

    #[test]
    fn full_universe_is_complete() {
        let keys: Vec<String> = index::all_keys().map(|k| k.to_string()).collect();
        let report = check(&keys).unwrap();
        assert_eq!(report.found, 6236);
        assert_eq!(report.coverage_percent, 100.0);
        assert!(report.missing.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn fatiha_only() {
        let report = check(fatiha_keys()).unwrap();
        assert_eq!(report.found, 7);
        assert_eq!(report.coverage_percent, 0.11);
        assert_eq!(report.missing.len(), 6229);
        assert_eq!(report.missing_count, 6229);
        assert_eq!(report.missing[0].to_string(), "2:1");
        assert_eq!(report.missing_sample(3).len(), 3);
    }

    #[test]
    fn orphans_reported_not_counted() {
        let mut keys = fatiha_keys();
        keys.push("1:8".into());
        keys.push("115:1".into());
        keys.push("9".into());
        let report = check(&keys).unwrap();
        assert_eq!(report.found, 7);
        assert_eq!(report.orphans, vec!["115:1", "1:8", "9"]);
        assert!(!report.is_complete());
    }

    #[test]
    fn malformed_key_fails() {
        let err = check(["1:1", "one:two"]).unwrap_err();
        assert_eq!(err, ReconError::MalformedKey("one:two".into()));
    }

    #[test]
    fn duplicate_raw_keys_count_once() {
        let report = check(["1:1", "1:1", "01:1"]).unwrap();
        assert_eq!(report.found, 1);
    }

    #[test]
    fn dataset_surah_keys_are_orphans_for_verse_coverage() {
        let mut ds: SourceDataset = fatiha_keys()
            .iter()
            .map(|k| (VerseKey::parse(k).unwrap(), "x"))
            .collect();
        ds.insert(DatasetKey::Surah(2), "commentary");
        ds.orphans.push("200:1".into());
        let report = check_dataset(&ds);
        assert_eq!(report.found, 7);
        assert_eq!(report.orphans, vec!["200:1", "2"]);
    }

    #[test]
    fn surah_scope() {
        let ds: SourceDataset = (1..=114u8)
            .filter(|s| ![67, 76, 80].contains(s))
            .map(|s| (DatasetKey::Surah(s), "t"))
            .collect();
        let report = check_surahs(&ds);
        assert_eq!(report.found, 111);
        assert_eq!(report.missing, vec![67, 76, 80]);
        assert_eq!(report.coverage_percent, 97.37);
    }

    #[test]
    fn partial_surahs() {
        let ds: SourceDataset = ["1:1", "1:2", "103:1", "103:2", "103:3"]
            .iter()
            .map(|k| (VerseKey::parse(k).unwrap(), "x"))
            .collect();
        let partial = per_surah(&ds);
        assert_eq!(partial, vec![SurahCoverage { surah: 1, expected: 7, found: 2 }]);
    }
}
