use std::collections::HashSet;

use crate::error::ReconError;
use crate::key::{DatasetKey, VerseKey};
use crate::model::{SimilarVerse, SourceDataset};

pub const DEFAULT_MIN_COMMON_WORDS: usize = 3;
pub const DEFAULT_LIMIT: usize = 10;
const PREVIEW_CHARS: usize = 100;

/// Verses sharing at least `min_common_words` distinct whitespace tokens with
/// `target`, most shared first (ties by key). A valid key absent from the
/// dataset yields an empty list.
pub fn find_similar(
    dataset: &SourceDataset,
    field: &str,
    target: &str,
    min_common_words: usize,
    limit: usize,
) -> Result<Vec<SimilarVerse>, ReconError> {
    let target = VerseKey::parse(target)?;
    let Some(target_text) = dataset.get(&DatasetKey::Verse(target)).and_then(|e| e.text(field)) else {
        return Ok(Vec::new());
    };
    let target_words: HashSet<&str> = target_text.split_whitespace().collect();

    let mut similar: Vec<SimilarVerse> = dataset
        .entries
        .iter()
        .filter_map(|(key, entry)| {
            let verse_key = key.verse()?;
            if verse_key == target {
                return None;
            }
            let text = entry.text(field)?;
            let words: HashSet<&str> = text.split_whitespace().collect();
            let common = words.intersection(&target_words).count();
            (common >= min_common_words).then(|| SimilarVerse {
                verse_key,
                common_words: common,
                text_preview: text.chars().take(PREVIEW_CHARS).collect(),
            })
        })
        .collect();

    similar.sort_by(|a, b| b.common_words.cmp(&a.common_words).then(a.verse_key.cmp(&b.verse_key)));
    similar.truncate(limit);
    Ok(similar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> SourceDataset {
        [
            ("1:1", "bismi allahi alrrahmani alrraheemi"),
            ("27:30", "innahu min sulaymana wainnahu bismi allahi alrrahmani alrraheemi"),
            ("1:3", "alrrahmani alrraheemi"),
            ("2:1", "alif lam meem"),
            ("11:41", "bismi allahi majraha"),
        ]
        .into_iter()
        .map(|(k, t)| (VerseKey::parse(k).unwrap(), t))
        .collect()
    }

    #[test]
    fn ranks_by_shared_words() {
        let found = find_similar(&dataset(), "text", "1:1", 3, 10).unwrap();
        let keys: Vec<String> = found.iter().map(|s| s.verse_key.to_string()).collect();
        assert_eq!(keys, vec!["27:30"]);
        assert_eq!(found[0].common_words, 4);

        let found = find_similar(&dataset(), "text", "1:1", 2, 10).unwrap();
        let keys: Vec<String> = found.iter().map(|s| s.verse_key.to_string()).collect();
        assert_eq!(keys, vec!["27:30", "1:3", "11:41"]);
    }

    #[test]
    fn limit_applies() {
        let found = find_similar(&dataset(), "text", "1:1", 1, 1).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn absent_target_is_empty_invalid_target_errors() {
        assert!(find_similar(&dataset(), "text", "2:2", 3, 10).unwrap().is_empty());
        assert_eq!(
            find_similar(&dataset(), "text", "1:9", 3, 10).unwrap_err(),
            ReconError::InvalidAyah { surah: 1, ayah: 9 }
        );
    }
}
