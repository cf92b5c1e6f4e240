//! `mushaf merge|validate`: config-driven source merging.

use std::path::PathBuf;

use serde_json::{json, Map, Value};

use mushaf_io::write::{merged_document, MergeProvenance};
use mushaf_io::{DocumentCache, ShapeHint};
use mushaf_recon::merge::merge_with_config;
use mushaf_recon::{coverage, DatasetKey, OcrCleaner};

use crate::exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_USAGE};
use crate::job::JobConfig;
use crate::output::{finish, OutputArgs};
use crate::CliError;

pub fn cmd_merge(job_path: PathBuf, out: OutputArgs) -> Result<(), CliError> {
    let job = JobConfig::load(&job_path)?;
    let Some(merge) = job.merge.as_ref() else {
        return Err(CliError::new(EXIT_CONFIG, format!("{}: no [merge] table", job_path.display()))
            .with_hint("add [merge] with primary and secondary source names"));
    };
    let artifact = out
        .output
        .clone()
        .or_else(|| merge.output.clone())
        .ok_or_else(|| {
            CliError::new(EXIT_USAGE, "no output path for the merged artifact")
                .with_hint("set merge.output in the job file or pass --output")
        })?;

    let primary_spec = job.source(&merge.primary)?;
    let secondary_spec = job.source(&merge.secondary)?;
    let mut cache = DocumentCache::new();
    let primary = mushaf_io::load_source_cached(primary_spec, &mut cache)?;
    let secondary = mushaf_io::load_source_cached(secondary_spec, &mut cache)?;

    let cleaner = OcrCleaner::new(job.cleaner.clone());
    let outcome = merge_with_config(&primary, &secondary, &merge.config, Some(&cleaner))?;

    let surah_scoped = !outcome.dataset.is_empty()
        && outcome.dataset.entries.keys().all(|k| matches!(k, DatasetKey::Surah(_)));
    let shape = merge.shape.unwrap_or(if surah_scoped {
        ShapeHint::SurahDict
    } else {
        ShapeHint::NestedDict
    });

    let provenance = MergeProvenance {
        source: merge.source.clone(),
        note: merge.note.clone(),
        primary: primary_spec.file.display().to_string(),
        secondary: secondary_spec.file.display().to_string(),
    };
    let doc = merged_document(
        &outcome.dataset,
        &outcome.stats,
        &provenance,
        shape,
        &primary_spec.text_field,
        chrono::Utc::now(),
    );
    mushaf_io::write_json_atomic(&artifact, &doc)?;
    eprintln!("wrote {}", artifact.display());

    let (check, findings) = if surah_scoped {
        let report = coverage::check_surahs(&outcome.dataset);
        let missing = report.missing.len();
        (json!({"scope": "surah", "report": report}), missing)
    } else {
        let report = coverage::check_dataset(&outcome.dataset);
        let missing = report.missing_count;
        (json!({"scope": "verse", "report": report}), missing)
    };

    let s = &outcome.stats;
    eprintln!(
        "merged {} entries: {} from {}, {} preferred from {}, {} gaps filled, {} chars cleaned",
        outcome.dataset.len(),
        s.from_primary,
        merge.primary,
        s.from_secondary_preferred,
        merge.secondary,
        s.gap_filled,
        s.cleaned_chars,
    );
    if findings == 0 {
        eprintln!("post-merge check: complete");
    } else {
        eprintln!("post-merge check: {findings} missing");
    }

    if out.json {
        let summary = json!({
            "output": artifact.display().to_string(),
            "primary": merge.primary,
            "secondary": merge.secondary,
            "entries": outcome.dataset.len(),
            "stats": outcome.stats,
            "orphans": outcome.dataset.orphans,
            "check": check,
        });
        let json_str = serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    finish(&out, findings, "missing after merge")
}

pub fn cmd_validate(job_path: PathBuf, json_output: bool) -> Result<(), CliError> {
    let job = JobConfig::load(&job_path)?;

    if json_output {
        let sources: Map<String, Value> = job
            .sources
            .iter()
            .map(|(name, spec)| {
                (
                    name.clone(),
                    json!({
                        "file": spec.file.display().to_string(),
                        "section": spec.section,
                        "shape": spec.shape,
                        "text_field": spec.text_field,
                        "strip_html": spec.strip_html,
                    }),
                )
            })
            .collect();
        let merge = job.merge.as_ref().map(|m| {
            json!({
                "primary": m.primary,
                "secondary": m.secondary,
                "prefer_secondary": m.config.prefer_secondary,
                "clean_primary": m.config.clean_primary,
                "clean_secondary": m.config.clean_secondary,
            })
        });
        let doc = json!({
            "valid": true,
            "name": job.name,
            "sources": sources,
            "merge": merge,
        });
        let json_str = serde_json::to_string_pretty(&doc)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    eprintln!(
        "{}: valid ({} sources{})",
        job_path.display(),
        job.sources.len(),
        if job.merge.is_some() { ", merge" } else { "" }
    );
    Ok(())
}
