//! Runs of consecutive verses that share one translation string.
//!
//! A translator sometimes renders several ayat as one sentence; the scraped
//! dataset then repeats that sentence under each verse. Both scans here are a
//! single linear pass in ascending ayah order.

use std::collections::BTreeSet;

use crate::model::{CombinedGroup, RangeSummary, SourceDataset, TranslationRange};

const PREVIEW_CHARS: usize = 100;

/// Open group while scanning: first/last ayah and the shared text.
struct Run<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

/// Split verses into maximal runs of consecutive ayat with identical,
/// non-empty text. Returns index ranges into the sorted input.
fn runs<'a, T>(sorted: &'a [T], ayah: impl Fn(&T) -> u16, text: impl Fn(&'a T) -> &'a str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut open: Option<Run<'a>> = None;

    for (i, item) in sorted.iter().enumerate() {
        let t = text(item);

        if let Some(run) = open.as_mut() {
            let contiguous = ayah(&sorted[run.end]).checked_add(1) == Some(ayah(item));
            if contiguous && !t.is_empty() && t == run.text {
                run.end = i;
                continue;
            }
            if run.end > run.start {
                out.push((run.start, run.end));
            }
            open = None;
        }

        // Empty text never opens a group.
        if !t.is_empty() {
            open = Some(Run { start: i, end: i, text: t });
        }
    }

    if let Some(run) = open {
        if run.end > run.start {
            out.push((run.start, run.end));
        }
    }

    out
}

/// Detect ranges in one surah. `verses` are `(ayah, translation)`; order is
/// normalized to ascending ayah before the scan. Empty translations and
/// missing ayat break any open group.
pub fn find_ranges(surah: u8, verses: &[(u16, &str)]) -> Vec<TranslationRange> {
    let mut sorted = verses.to_vec();
    sorted.sort_by_key(|(ayah, _)| *ayah);

    runs(&sorted, |(a, _)| *a, |(_, t)| *t)
        .into_iter()
        .map(|(s, e)| TranslationRange {
            surah,
            start_verse: sorted[s].0,
            end_verse: sorted[e].0,
            verse_count: (e - s + 1) as u16,
        })
        .collect()
}

/// Same scan as [`find_ranges`], keeping only groups whose source-language
/// text differs across the grouped ayat. A group with identical originals is
/// a true duplicate, not a combined translation.
///
/// `verses` are `(ayah, translation, original)`.
pub fn find_combined_translations(surah: u8, verses: &[(u16, &str, &str)]) -> Vec<CombinedGroup> {
    let mut sorted = verses.to_vec();
    sorted.sort_by_key(|(ayah, _, _)| *ayah);

    runs(&sorted, |(a, _, _)| *a, |(_, t, _)| *t)
        .into_iter()
        .filter_map(|(s, e)| {
            let group = &sorted[s..=e];
            let distinct: BTreeSet<&str> = group.iter().map(|(_, _, o)| *o).collect();
            if distinct.len() < 2 {
                return None;
            }
            Some(CombinedGroup {
                surah,
                verses: group.iter().map(|(a, _, _)| *a).collect(),
                translation: preview(group[0].1),
                distinct_source_count: distinct.len(),
            })
        })
        .collect()
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Ranges across every surah of a translation dataset, ascending.
pub fn find_dataset_ranges(dataset: &SourceDataset, field: &str) -> Vec<TranslationRange> {
    dataset
        .surahs_present()
        .into_iter()
        .flat_map(|surah| find_ranges(surah, &dataset.surah_verses(surah, field)))
        .collect()
}

/// Combined-translation groups across a translation dataset, using
/// `originals` for the differing-source predicate. An ayah with no original
/// (or an empty one) is left out of the scan, so it breaks any open group.
pub fn find_dataset_combined(
    translations: &SourceDataset,
    translation_field: &str,
    originals: &SourceDataset,
    original_field: &str,
) -> Vec<CombinedGroup> {
    translations
        .surahs_present()
        .into_iter()
        .flat_map(|surah| {
            let source: std::collections::BTreeMap<u16, &str> =
                originals.surah_verses(surah, original_field).into_iter().collect();
            let verses: Vec<(u16, &str, &str)> = translations
                .surah_verses(surah, translation_field)
                .into_iter()
                .filter_map(|(ayah, t)| match source.get(&ayah) {
                    Some(o) if !o.is_empty() => Some((ayah, t, *o)),
                    _ => None,
                })
                .collect();
            find_combined_translations(surah, &verses)
        })
        .collect()
}

pub fn summarize(ranges: &[TranslationRange]) -> RangeSummary {
    RangeSummary {
        total_ranges: ranges.len(),
        total_affected_verses: ranges.iter().map(|r| r.verse_count as usize).sum(),
    }
}
