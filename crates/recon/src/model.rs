use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::key::{DatasetKey, VerseKey};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Payload stored under one dataset key.
///
/// Verse translations are plain text; surah-scoped commentary usually comes
/// as an object (`{"name": ..., "tefsir": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Text(String),
    Record(serde_json::Map<String, serde_json::Value>),
}

impl Entry {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Record(_) => "record",
        }
    }

    /// Text view: the string itself, or the named field of a record.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Record(map) => map.get(field).and_then(|v| v.as_str()),
        }
    }

    /// Total characters across all string content.
    pub fn char_len(&self) -> usize {
        match self {
            Self::Text(s) => s.chars().count(),
            Self::Record(map) => map
                .values()
                .filter_map(|v| v.as_str())
                .map(|s| s.chars().count())
                .sum(),
        }
    }
}

impl From<&str> for Entry {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Entry {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Canonical `key -> payload` map produced by the boundary adapter.
///
/// `orphans` holds keys that parsed as numbers but fall outside the verse
/// universe; they never enter `entries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDataset {
    pub entries: BTreeMap<DatasetKey, Entry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orphans: Vec<String>,
}

impl SourceDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<DatasetKey>, entry: impl Into<Entry>) {
        self.entries.insert(key.into(), entry.into());
    }

    pub fn get(&self, key: &DatasetKey) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn verse_keys(&self) -> impl Iterator<Item = VerseKey> + '_ {
        self.entries.keys().filter_map(|k| k.verse())
    }

    /// Surahs that carry an entry of their own or any verse entry.
    pub fn surahs_present(&self) -> std::collections::BTreeSet<u8> {
        self.entries.keys().map(|k| k.surah()).collect()
    }

    /// `(ayah, text)` for one surah, ascending. Non-text or missing field
    /// entries yield an empty string so callers can treat them as gaps.
    pub fn surah_verses<'a>(&'a self, surah: u8, field: &str) -> Vec<(u16, &'a str)> {
        self.entries
            .range(DatasetKey::Surah(surah)..=DatasetKey::Surah(surah.saturating_add(1)))
            .filter_map(|(k, e)| match k {
                DatasetKey::Verse(v) if v.surah() == surah => Some((v.ayah(), e.text(field).unwrap_or(""))),
                _ => None,
            })
            .collect()
    }
}

impl<K: Into<DatasetKey>, E: Into<Entry>> FromIterator<(K, E)> for SourceDataset {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, e)| (k.into(), e.into())).collect(),
            orphans: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub total_expected: usize,
    pub found: usize,
    pub missing_count: usize,
    pub missing: Vec<VerseKey>,
    pub orphans: Vec<String>,
    pub coverage_percent: f64,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.orphans.is_empty()
    }

    pub fn missing_sample(&self, n: usize) -> &[VerseKey] {
        &self.missing[..n.min(self.missing.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurahCoverage {
    pub surah: u8,
    pub expected: u16,
    pub found: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurahCoverageReport {
    pub total_expected: usize,
    pub found: usize,
    pub missing: Vec<u8>,
    pub orphans: Vec<String>,
    pub coverage_percent: f64,
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Verses `start_verse..=end_verse` of `surah` share one translation string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRange {
    pub surah: u8,
    pub start_verse: u16,
    pub end_verse: u16,
    pub verse_count: u16,
}

impl TranslationRange {
    /// `"2:1-3"`
    pub fn label(&self) -> String {
        format!("{}:{}-{}", self.surah, self.start_verse, self.end_verse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub total_ranges: usize,
    pub total_affected_verses: usize,
}

/// A translation shared by consecutive verses whose original text differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedGroup {
    pub surah: u8,
    pub verses: Vec<u16>,
    pub translation: String,
    pub distinct_source_count: usize,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub from_primary: usize,
    pub from_secondary_preferred: usize,
    pub gap_filled: usize,
    /// Characters removed by the cleaner across all entries.
    pub cleaned_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub dataset: SourceDataset,
    pub stats: MergeStats,
}

// ---------------------------------------------------------------------------
// Similar verses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarVerse {
    pub verse_key: VerseKey,
    pub common_words: usize,
    pub text_preview: String,
}

// ---------------------------------------------------------------------------
// Quality scans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HtmlIssueReport {
    pub span_tag_issues: usize,
    pub div_tag_issues: usize,
    pub entity_issues: usize,
    pub other_tag_issues: usize,
    pub samples: HtmlIssueSamples,
}

impl HtmlIssueReport {
    pub fn total(&self) -> usize {
        self.span_tag_issues + self.div_tag_issues + self.entity_issues + self.other_tag_issues
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HtmlIssueSamples {
    pub span: Vec<String>,
    pub div: Vec<String>,
    pub entities: Vec<String>,
    pub other: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingIssueKind {
    PossibleUtf8AsLatin1,
    ReplacementCharacter,
}

impl std::fmt::Display for EncodingIssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PossibleUtf8AsLatin1 => write!(f, "possible_utf8_as_latin1"),
            Self::ReplacementCharacter => write!(f, "replacement_character"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodingIssue {
    pub key: String,
    pub issue: EncodingIssueKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncodingReport {
    pub encoding_issues: usize,
    pub issues: Vec<EncodingIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanReference {
    pub key: DatasetKey,
    pub refs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceReport {
    pub total_translations: usize,
    pub translations_with_references: usize,
    pub translations_with_commentary: usize,
    pub match_rate: f64,
    pub orphan_refs_count: usize,
    pub orphan_samples: Vec<OrphanReference>,
}
