//! `mushaf quality|references`: data-quality scans.

use std::path::PathBuf;

use serde_json::json;

use mushaf_recon::quality::{scan_encoding, scan_html, validate_references};

use crate::output::{emit, finish, load_sources, OutputArgs};
use crate::CliError;

pub fn cmd_quality(job: PathBuf, source: String, out: OutputArgs) -> Result<(), CliError> {
    let (_, [dataset]) = load_sources(&job, [source.as_str()])?;

    let html = scan_html(&dataset);
    let encoding = scan_encoding(&dataset);
    emit(
        &json!({
            "source": source,
            "entries": dataset.len(),
            "html": html,
            "encoding": encoding,
        }),
        &out,
    )?;

    eprintln!(
        "{source}: {} entries; html: {} span, {} div, {} entities, {} other; encoding: {}",
        dataset.len(),
        html.span_tag_issues,
        html.div_tag_issues,
        html.entity_issues,
        html.other_tag_issues,
        encoding.encoding_issues,
    );
    for issue in encoding.issues.iter().take(5) {
        eprintln!("  {}: {:?}", issue.key, issue.issue);
    }

    finish(&out, html.total() + encoding.encoding_issues, "quality issues")
}

pub fn cmd_references(
    job: PathBuf,
    translations: String,
    commentary: String,
    out: OutputArgs,
) -> Result<(), CliError> {
    let (job, [tr, cm]) = load_sources(&job, [translations.as_str(), commentary.as_str()])?;
    let field = &job.source(&translations)?.text_field;

    let report = validate_references(&tr, field, &cm);
    emit(&report, &out)?;

    eprintln!(
        "{translations}: {} with references, {} with commentary ({}%), {} orphan",
        report.translations_with_references,
        report.translations_with_commentary,
        report.match_rate,
        report.orphan_refs_count,
    );
    for orphan in &report.orphan_samples {
        eprintln!("  {}: ({})", orphan.key, orphan.refs.join(") ("));
    }

    finish(&out, report.orphan_refs_count, "orphan references")
}
