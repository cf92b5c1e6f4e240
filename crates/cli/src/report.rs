//! `mushaf coverage|ranges|duplicates|similar`: read-only reports over one
//! or two sources.

use std::path::PathBuf;

use serde_json::json;

use mushaf_io::write::{duplicates_document, ranges_document};
use mushaf_recon::ranges::{find_dataset_combined, find_dataset_ranges, summarize};
use mushaf_recon::{coverage, similar, DatasetKey, VerseKey};

use crate::exit_codes::EXIT_USAGE;
use crate::output::{emit, finish, load_sources, OutputArgs};
use crate::{CliError, Scope};

/// Missing keys listed in the human summary.
const MISSING_SAMPLE: usize = 20;

pub fn cmd_coverage(job: PathBuf, source: String, scope: Scope, out: OutputArgs) -> Result<(), CliError> {
    let (_, [dataset]) = load_sources(&job, [source.as_str()])?;

    let surah_scoped = match scope {
        Scope::Surah => true,
        Scope::Verse => false,
        Scope::Auto => {
            !dataset.is_empty() && dataset.entries.keys().all(|k| matches!(k, DatasetKey::Surah(_)))
        }
    };

    if surah_scoped {
        let report = coverage::check_surahs(&dataset);
        emit(
            &json!({
                "source": source,
                "scope": "surah",
                "report": report,
            }),
            &out,
        )?;

        eprintln!(
            "{source}: {}/{} surahs ({}%), {} missing, {} orphans",
            report.found,
            report.total_expected,
            report.coverage_percent,
            report.missing.len(),
            report.orphans.len(),
        );
        if !report.missing.is_empty() {
            let list: Vec<String> = report.missing.iter().map(u8::to_string).collect();
            eprintln!("missing surahs: {}", list.join(", "));
        }
        return finish(&out, report.missing.len() + report.orphans.len(), "missing or orphan surahs");
    }

    let report = coverage::check_dataset(&dataset);
    let partial = coverage::per_surah(&dataset);
    emit(
        &json!({
            "source": source,
            "scope": "verse",
            "report": report,
            "partial_surahs": partial,
        }),
        &out,
    )?;

    eprintln!(
        "{source}: {}/{} verses ({}%), {} missing, {} orphans",
        report.found, report.total_expected, report.coverage_percent, report.missing_count, report.orphans.len(),
    );
    if !report.is_complete() {
        let sample: Vec<String> = report.missing_sample(MISSING_SAMPLE).iter().map(VerseKey::to_string).collect();
        let more = report.missing_count.saturating_sub(sample.len());
        if more > 0 {
            eprintln!("missing: {} (+{more} more)", sample.join(", "));
        } else {
            eprintln!("missing: {}", sample.join(", "));
        }
    }
    for s in partial.iter().take(MISSING_SAMPLE) {
        eprintln!("  surah {:>3}: {}/{}", s.surah, s.found, s.expected);
    }

    finish(&out, report.missing_count + report.orphans.len(), "missing or orphan keys")
}

pub fn cmd_ranges(job: PathBuf, source: String, out: OutputArgs) -> Result<(), CliError> {
    let (job, [dataset]) = load_sources(&job, [source.as_str()])?;
    let field = &job.source(&source)?.text_field;

    let ranges = find_dataset_ranges(&dataset, field);
    let doc = ranges_document(&ranges, chrono::Utc::now());
    emit(&doc, &out)?;

    let summary = summarize(&ranges);
    eprintln!(
        "{source}: {} ranges covering {} verses",
        summary.total_ranges, summary.total_affected_verses
    );
    finish(&out, summary.total_ranges, "translation ranges")
}

pub fn cmd_duplicates(job: PathBuf, translation: String, original: String, out: OutputArgs) -> Result<(), CliError> {
    let (job, [translations, originals]) = load_sources(&job, [translation.as_str(), original.as_str()])?;
    let tfield = &job.source(&translation)?.text_field;
    let ofield = &job.source(&original)?.text_field;

    let groups = find_dataset_combined(&translations, tfield, &originals, ofield);
    emit(&duplicates_document(&groups), &out)?;

    let affected: usize = groups.iter().map(|g| g.verses.len()).sum();
    eprintln!("{translation}: {} combined translations over {affected} verses", groups.len());
    for g in groups.iter().take(MISSING_SAMPLE) {
        let first = g.verses.first().copied().unwrap_or_default();
        let last = g.verses.last().copied().unwrap_or_default();
        eprintln!("  {}:{first}-{last}  {}", g.surah, g.translation);
    }
    finish(&out, groups.len(), "combined translations")
}

pub fn cmd_similar(
    job: PathBuf,
    source: String,
    key: String,
    min_common: usize,
    limit: usize,
    out: OutputArgs,
) -> Result<(), CliError> {
    let target = VerseKey::parse(&key).map_err(|e| {
        CliError::new(EXIT_USAGE, e.to_string()).with_hint("verse keys look like 2:255")
    })?;
    let (job, [dataset]) = load_sources(&job, [source.as_str()])?;
    let field = &job.source(&source)?.text_field;

    let found = similar::find_similar(&dataset, field, &target.to_string(), min_common, limit)?;
    emit(
        &json!({
            "target": target,
            "min_common_words": min_common,
            "similar": found,
        }),
        &out,
    )?;

    eprintln!("{target}: {} similar verses (>= {min_common} shared words)", found.len());
    for s in &found {
        eprintln!("  {:>8}  {:>3}  {}", s.verse_key.to_string(), s.common_words, s.text_preview);
    }
    Ok(())
}
