//! `*.mushaf.toml` job files: named sources plus optional `[merge]` and
//! `[cleaner]` tables.
//!
//! ```toml
//! [sources.old_backup]
//! file = "tefsir_old.json"
//! shape = "surah_dict"
//! text_field = "tefsir"
//!
//! [sources.current]
//! file = "tefsir.json"
//! section = "surahs"
//!
//! [merge]
//! primary = "old_backup"
//! secondary = "current"
//! output = "tefsir_merged.json"
//! prefer_secondary = ["67", "76", "80"]
//! clean_secondary = true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use mushaf_io::{ShapeHint, SourceSpec};
use mushaf_recon::{CleanerConfig, MergeConfig, ReconError};

use crate::exit_codes::{EXIT_CONFIG, EXIT_USAGE};
use crate::CliError;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceSpec>,
    #[serde(default)]
    pub merge: Option<MergeJob>,
    #[serde(default)]
    pub cleaner: CleanerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeJob {
    pub primary: String,
    pub secondary: String,
    /// Merged artifact path; `--output` overrides it.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Artifact layout. Defaults to the primary source's layout.
    #[serde(default)]
    pub shape: Option<ShapeHint>,
    /// Free-text provenance copied into the artifact metadata.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub note: String,
    #[serde(flatten)]
    pub config: MergeConfig,
}

impl JobConfig {
    /// Parse and validate. Relative source and output paths resolve against
    /// `base_dir`.
    pub fn from_toml(input: &str, base_dir: &Path) -> Result<Self, ReconError> {
        let mut job: JobConfig = toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;

        job.sources = std::mem::take(&mut job.sources)
            .into_iter()
            .map(|(name, spec)| (name, spec.resolved(base_dir)))
            .collect();
        if let Some(merge) = job.merge.as_mut() {
            if let Some(out) = merge.output.take() {
                merge.output = Some(if out.is_relative() { base_dir.join(out) } else { out });
            }
        }

        job.validate()?;
        Ok(job)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| CliError {
            code: EXIT_CONFIG,
            message: format!("cannot read job file {}: {e}", path.display()),
            hint: None,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml(&text, base_dir).map_err(|e| CliError {
            code: EXIT_CONFIG,
            message: format!("{}: {e}", path.display()),
            hint: None,
        })
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (name, spec) in &self.sources {
            if spec.file.as_os_str().is_empty() {
                return Err(ReconError::ConfigValidation(format!("source '{name}': file must not be empty")));
            }
            if spec.text_field.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{name}': text_field must not be empty"
                )));
            }
        }

        if let Some(merge) = &self.merge {
            for (role, name) in [("primary", &merge.primary), ("secondary", &merge.secondary)] {
                if !self.sources.contains_key(name) {
                    return Err(ReconError::ConfigValidation(format!(
                        "merge.{role} refers to unknown source '{name}'"
                    )));
                }
            }
            if merge.primary == merge.secondary {
                return Err(ReconError::ConfigValidation(
                    "merge.primary and merge.secondary must differ".into(),
                ));
            }
            merge.config.validate()?;
        }

        self.cleaner.validate()
    }

    pub fn source(&self, name: &str) -> Result<&SourceSpec, CliError> {
        self.sources.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.sources.keys().map(String::as_str).collect();
            CliError {
                code: EXIT_USAGE,
                message: format!("unknown source '{name}'"),
                hint: Some(if known.is_empty() {
                    "the job file defines no [sources.*] tables".to_string()
                } else {
                    format!("sources in this job: {}", known.join(", "))
                }),
            }
        })
    }
}
