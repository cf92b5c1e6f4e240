use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::clean::TextCleaner;
use crate::config::MergeConfig;
use crate::error::ReconError;
use crate::key::DatasetKey;
use crate::model::{Entry, MergeOutcome, MergeStats, SourceDataset};

/// How the cleaner is applied during a merge.
pub struct CleanPlan<'a> {
    pub cleaner: &'a dyn TextCleaner,
    pub clean_primary: bool,
    pub clean_secondary: bool,
    /// Record fields to clean. Empty = every string field.
    pub fields: &'a [String],
}

impl<'a> CleanPlan<'a> {
    pub fn from_config(cleaner: &'a dyn TextCleaner, config: &'a MergeConfig) -> Self {
        Self {
            cleaner,
            clean_primary: config.clean_primary,
            clean_secondary: config.clean_secondary,
            fields: &config.clean_fields,
        }
    }

    fn apply(&self, entry: &Entry) -> (Entry, usize) {
        let before = entry.char_len();
        let cleaned = match entry {
            Entry::Text(s) => Entry::Text(self.cleaner.clean(s)),
            Entry::Record(map) => {
                let mut out = map.clone();
                for (field, value) in out.iter_mut() {
                    let wanted = self.fields.is_empty() || self.fields.iter().any(|f| f == field);
                    if let (true, Some(s)) = (wanted, value.as_str()) {
                        *value = serde_json::Value::String(self.cleaner.clean(s));
                    }
                }
                Entry::Record(out)
            }
        };
        let removed = before.saturating_sub(cleaned.char_len());
        (cleaned, removed)
    }
}

fn take(entry: &Entry, clean: Option<&CleanPlan<'_>>, side_enabled: bool, stats: &mut MergeStats) -> Entry {
    match clean {
        Some(plan) if side_enabled => {
            let (cleaned, removed) = plan.apply(entry);
            stats.cleaned_chars += removed;
            cleaned
        }
        _ => entry.clone(),
    }
}

/// Merge `primary` with `secondary`.
///
/// Start from primary's entries; keys in `prefer_secondary` take secondary's
/// entry; any key only in secondary fills the gap. Missing keys are never an
/// error. A key whose value is text on one side and a record on the other is
/// `ShapeMismatch`. Orphan keys of both inputs are carried into the output's
/// orphan list.
pub fn merge(
    primary: &SourceDataset,
    secondary: &SourceDataset,
    prefer_secondary: &BTreeSet<DatasetKey>,
    clean: Option<&CleanPlan<'_>>,
) -> Result<MergeOutcome, ReconError> {
    for (key, p) in &primary.entries {
        if let Some(s) = secondary.entries.get(key) {
            if p.kind() != s.kind() {
                return Err(ReconError::ShapeMismatch {
                    key: key.to_string(),
                    primary: p.kind(),
                    secondary: s.kind(),
                });
            }
        }
    }

    let mut stats = MergeStats::default();
    let mut out = SourceDataset::new();

    for (key, entry) in &primary.entries {
        let from_secondary = prefer_secondary.contains(key).then(|| secondary.entries.get(key)).flatten();
        let value = match from_secondary {
            Some(s) => {
                debug!(%key, "secondary preferred");
                stats.from_secondary_preferred += 1;
                take(s, clean, clean.is_some_and(|c| c.clean_secondary), &mut stats)
            }
            None => {
                stats.from_primary += 1;
                take(entry, clean, clean.is_some_and(|c| c.clean_primary), &mut stats)
            }
        };
        out.entries.insert(*key, value);
    }

    for (key, entry) in &secondary.entries {
        if out.entries.contains_key(key) {
            continue;
        }
        if prefer_secondary.contains(key) {
            stats.from_secondary_preferred += 1;
        } else {
            stats.gap_filled += 1;
        }
        debug!(%key, "filled from secondary");
        out.entries
            .insert(*key, take(entry, clean, clean.is_some_and(|c| c.clean_secondary), &mut stats));
    }

    for key in prefer_secondary {
        if !secondary.entries.contains_key(key) {
            warn!(%key, "preferred key absent from secondary; primary entry kept");
        }
    }

    let mut orphans: Vec<String> = primary.orphans.iter().chain(&secondary.orphans).cloned().collect();
    orphans.sort();
    orphans.dedup();
    out.orphans = orphans;

    info!(
        entries = out.len(),
        from_primary = stats.from_primary,
        preferred = stats.from_secondary_preferred,
        gap_filled = stats.gap_filled,
        cleaned_chars = stats.cleaned_chars,
        "merge complete"
    );

    Ok(MergeOutcome { dataset: out, stats })
}

/// Merge driven by a [`MergeConfig`].
pub fn merge_with_config(
    primary: &SourceDataset,
    secondary: &SourceDataset,
    config: &MergeConfig,
    cleaner: Option<&dyn TextCleaner>,
) -> Result<MergeOutcome, ReconError> {
    let prefer: BTreeSet<DatasetKey> = config.prefer_secondary_keys()?.into_iter().collect();
    let plan = cleaner.map(|c| CleanPlan::from_config(c, config));
    merge(primary, secondary, &prefer, plan.as_ref())
}
