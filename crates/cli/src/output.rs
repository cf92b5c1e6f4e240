//! Shared `--json` / `--output` / `--strict` handling.
//!
//! stdout carries exactly one JSON value when `--json` is given and nothing
//! otherwise; human summaries and logs go to stderr.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use mushaf_io::DocumentCache;
use mushaf_recon::SourceDataset;

use crate::exit_codes::{EXIT_ERROR, EXIT_FINDINGS};
use crate::job::JobConfig;
use crate::CliError;

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output JSON to stdout instead of human summary
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Exit 6 when the report has findings
    #[arg(long)]
    pub strict: bool,
}

/// Serialize `report` once, then send it to `--output` and/or stdout.
pub fn emit<T: Serialize + ?Sized>(report: &T, out: &OutputArgs) -> Result<(), CliError> {
    if let Some(ref path) = out.output {
        mushaf_io::write_json_atomic(path, report)?;
        eprintln!("wrote {}", path.display());
    }

    if out.json {
        let json_str = serde_json::to_string_pretty(report)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }
    Ok(())
}

/// Exit status after the report is out: findings fail only under `--strict`.
pub fn finish(out: &OutputArgs, findings: usize, what: &str) -> Result<(), CliError> {
    if out.strict && findings > 0 {
        return Err(CliError::new(EXIT_FINDINGS, format!("{findings} {what} (--strict)")));
    }
    Ok(())
}

/// Load a job and the named sources, sharing one document cache.
pub fn load_sources<const N: usize>(
    job_path: &Path,
    names: [&str; N],
) -> Result<(JobConfig, [SourceDataset; N]), CliError> {
    let job = JobConfig::load(job_path)?;
    let mut cache = DocumentCache::new();
    let mut datasets: Vec<SourceDataset> = Vec::with_capacity(N);
    for name in names {
        let spec = job.source(name)?;
        datasets.push(mushaf_io::load_source_cached(spec, &mut cache)?);
    }
    let datasets: [SourceDataset; N] = datasets
        .try_into()
        .map_err(|_| CliError::new(EXIT_ERROR, "internal: source count mismatch"))?;
    tracing::debug!(job = %job_path.display(), sources = N, documents = cache.len(), "loaded sources");
    Ok((job, datasets))
}
