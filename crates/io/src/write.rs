// Artifact writers
//
// Artifacts are written to a temp file beside the target and renamed into
// place, so readers never see a half-written file.

use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tempfile::NamedTempFile;

use mushaf_recon::model::{CombinedGroup, MergeStats};
use mushaf_recon::ranges::summarize;
use mushaf_recon::{SourceDataset, TranslationRange};

use crate::error::IoError;
use crate::shape::{denormalize, ShapeHint};

pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IoError> {
    write_atomic(path, |w| {
        serde_json::to_writer_pretty(&mut *w, value).map_err(std::io::Error::from)?;
        w.write_all(b"\n")
    })
}

pub fn write_text_atomic(path: &Path, text: &str) -> Result<(), IoError> {
    write_atomic(path, |w| w.write_all(text.as_bytes()))
}

fn write_atomic(
    path: &Path,
    fill: impl FnOnce(&mut BufWriter<&std::fs::File>) -> std::io::Result<()>,
) -> Result<(), IoError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| IoError::write(path, e))?;

    let temp = NamedTempFile::new_in(parent).map_err(|e| IoError::write(path, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        fill(&mut writer).map_err(|e| IoError::write(path, e))?;
        writer.flush().map_err(|e| IoError::write(path, e))?;
    }
    temp.persist(path).map_err(|e| IoError::write(path, e.error))?;

    tracing::info!(path = %path.display(), "wrote artifact");
    Ok(())
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

pub fn ranges_document(ranges: &[TranslationRange], generated_at: DateTime<Utc>) -> Value {
    let summary = summarize(ranges);
    let by_label: Map<String, Value> = ranges
        .iter()
        .map(|r| (r.label(), json!(r)))
        .collect();

    json!({
        "metadata": {
            "description": "Consecutive verses sharing one translation",
            "total_ranges": summary.total_ranges,
            "total_affected_verses": summary.total_affected_verses,
            "generated_at": generated_at.to_rfc3339(),
        },
        "ranges": by_label,
    })
}

pub fn duplicates_document(groups: &[CombinedGroup]) -> Value {
    let affected: usize = groups.iter().map(|g| g.verses.len()).sum();
    json!({
        "description": "Verses with differing originals that share one combined translation",
        "total_groups": groups.len(),
        "total_affected_verses": affected,
        "duplicates": groups,
    })
}

/// Labels recorded in a merged artifact's metadata.
#[derive(Debug, Clone, Default)]
pub struct MergeProvenance {
    pub source: String,
    pub note: String,
    pub primary: String,
    pub secondary: String,
}

/// Merged dataset under `surahs` (surah-scoped layouts) or `verses`
/// (everything else), in the given layout.
pub fn merged_document(
    dataset: &SourceDataset,
    stats: &MergeStats,
    provenance: &MergeProvenance,
    shape: ShapeHint,
    text_field: &str,
    merged_at: DateTime<Utc>,
) -> Value {
    let body_key = match shape {
        ShapeHint::SurahDict => "surahs",
        _ => "verses",
    };

    let mut doc = Map::new();
    doc.insert(
        "metadata".into(),
        json!({
            "source": provenance.source,
            "merged_at": merged_at.to_rfc3339(),
            "note": provenance.note,
            "primary": provenance.primary,
            "secondary": provenance.secondary,
            "cleaned_chars": stats.cleaned_chars,
            "orphans": dataset.orphans,
        }),
    );
    doc.insert(body_key.into(), denormalize(dataset, shape, text_field));
    Value::Object(doc)
}
