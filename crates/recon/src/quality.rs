//! Data-quality scans over normalized datasets: leftover HTML, mojibake, and
//! footnote references without commentary.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{
    EncodingIssue, EncodingIssueKind, EncodingReport, HtmlIssueReport, OrphanReference, ReferenceReport,
    SourceDataset,
};

const HTML_SAMPLES: usize = 5;
const ENCODING_SAMPLES: usize = 20;
const ORPHAN_SAMPLES: usize = 10;

static SPAN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?span").unwrap());
static DIV_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?div").unwrap());
static ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)&[a-z]+;").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<[a-z][^>]*>").unwrap());
static STRIP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static FOOTNOTE_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\)").unwrap());

/// `(key, text)` for every string in the dataset; record fields are keyed
/// `"key.field"`.
fn texts(dataset: &SourceDataset) -> Vec<(String, &str)> {
    let mut out = Vec::new();
    for (key, entry) in &dataset.entries {
        match entry {
            crate::model::Entry::Text(s) => out.push((key.to_string(), s.as_str())),
            crate::model::Entry::Record(map) => {
                for (field, value) in map {
                    if let Some(s) = value.as_str() {
                        out.push((format!("{key}.{field}"), s));
                    }
                }
            }
        }
    }
    out
}

fn push_sample(samples: &mut Vec<String>, key: &str) {
    if samples.len() < HTML_SAMPLES {
        samples.push(key.to_string());
    }
}

pub fn scan_html(dataset: &SourceDataset) -> HtmlIssueReport {
    let mut report = HtmlIssueReport::default();

    for (key, text) in texts(dataset) {
        if SPAN_TAG.is_match(text) {
            report.span_tag_issues += 1;
            push_sample(&mut report.samples.span, &key);
        }
        if DIV_TAG.is_match(text) {
            report.div_tag_issues += 1;
            push_sample(&mut report.samples.div, &key);
        }
        if ENTITY.is_match(text) {
            report.entity_issues += 1;
            push_sample(&mut report.samples.entities, &key);
        }
        if ANY_TAG.is_match(text) {
            report.other_tag_issues += 1;
            push_sample(&mut report.samples.other, &key);
        }
    }

    report
}

pub fn scan_encoding(dataset: &SourceDataset) -> EncodingReport {
    let mut issues = Vec::new();

    for (key, text) in texts(dataset) {
        if text.contains(['Ã', 'Ä', 'Å']) {
            issues.push(EncodingIssue {
                key: key.clone(),
                issue: EncodingIssueKind::PossibleUtf8AsLatin1,
            });
        }
        if text.contains('\u{FFFD}') {
            issues.push(EncodingIssue {
                key,
                issue: EncodingIssueKind::ReplacementCharacter,
            });
        }
    }

    let total = issues.len();
    issues.truncate(ENCODING_SAMPLES);
    EncodingReport {
        encoding_issues: total,
        issues,
    }
}

/// Cross-check footnote markers `(N)` in translations against commentary
/// keyed the same way.
pub fn validate_references(
    translations: &SourceDataset,
    field: &str,
    commentary: &SourceDataset,
) -> ReferenceReport {
    let mut with_refs = 0;
    let mut with_commentary = 0;
    let mut orphans = Vec::new();

    for (key, entry) in &translations.entries {
        let Some(text) = entry.text(field) else {
            continue;
        };
        let refs: Vec<String> = FOOTNOTE_REF.captures_iter(text).map(|c| c[1].to_string()).collect();
        if refs.is_empty() {
            continue;
        }
        with_refs += 1;
        if commentary.entries.contains_key(key) {
            with_commentary += 1;
        } else {
            orphans.push(OrphanReference { key: *key, refs });
        }
    }

    let match_rate = (with_commentary as f64 / with_refs.max(1) as f64 * 100.0 * 100.0).round() / 100.0;
    let orphan_count = orphans.len();
    orphans.truncate(ORPHAN_SAMPLES);

    ReferenceReport {
        total_translations: translations.len(),
        translations_with_references: with_refs,
        translations_with_commentary: with_commentary,
        match_rate,
        orphan_refs_count: orphan_count,
        orphan_samples: orphans,
    }
}

/// Remove HTML tags and trim.
pub fn strip_html_tags(text: &str) -> String {
    STRIP_TAG.replace_all(text, "").trim().to_string()
}
