// Source loading: file -> JSON -> section -> shape -> SourceDataset

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use mushaf_recon::quality::strip_html_tags;
use mushaf_recon::{Entry, SourceDataset};

use crate::cache::DocumentCache;
use crate::error::IoError;
use crate::shape::{RawDataset, ShapeHint};

fn default_text_field() -> String {
    "translation".to_string()
}

/// Where one dataset comes from and how to read it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    pub file: PathBuf,
    /// Dotted path to the sub-document holding the dataset (`"data.verses"`).
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub shape: Option<ShapeHint>,
    /// Verse field read from `list_of_surahs` documents.
    #[serde(default = "default_text_field")]
    pub text_field: String,
    #[serde(default)]
    pub strip_html: bool,
}

impl SourceSpec {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            section: None,
            shape: None,
            text_field: default_text_field(),
            strip_html: false,
        }
    }

    /// Resolve a relative `file` against `base` (the job file's directory).
    pub fn resolved(mut self, base: &Path) -> Self {
        if self.file.is_relative() {
            self.file = base.join(&self.file);
        }
        self
    }
}

/// Read a text file as UTF-8. A leading BOM is dropped; bytes that are not
/// valid UTF-8 are decoded as Windows-1254 (Turkish), the usual encoding of
/// legacy exports.
pub fn read_text_file(path: &Path) -> Result<String, IoError> {
    let mut file = std::fs::File::open(path).map_err(|e| IoError::read(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| IoError::read(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(match s.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_string(),
            None => s,
        }),
        Err(e) => {
            let bytes = e.into_bytes();
            tracing::warn!(path = %path.display(), "not valid UTF-8, decoding as windows-1254");
            let (decoded, _, _) = encoding_rs::WINDOWS_1254.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

pub fn read_json(path: &Path) -> Result<Value, IoError> {
    let text = read_text_file(path)?;
    serde_json::from_str(&text).map_err(|e| IoError::json(path, e))
}

/// Pick a dotted `section` out of `doc`.
pub fn select_section<'a>(doc: &'a Value, section: Option<&str>) -> Result<&'a Value, IoError> {
    let Some(section) = section.filter(|s| !s.is_empty()) else {
        return Ok(doc);
    };
    let mut current = doc;
    for part in section.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| IoError::Shape(format!("section '{section}' not found (missing '{part}')")))?;
    }
    Ok(current)
}

pub fn load_source(spec: &SourceSpec) -> Result<SourceDataset, IoError> {
    let doc = read_json(&spec.file)?;
    dataset_from_document(&doc, spec)
}

pub fn load_source_cached(spec: &SourceSpec, cache: &mut DocumentCache) -> Result<SourceDataset, IoError> {
    let doc = cache.get_or_load(&spec.file)?;
    dataset_from_document(&doc, spec)
}

fn dataset_from_document(doc: &Value, spec: &SourceSpec) -> Result<SourceDataset, IoError> {
    let value = select_section(doc, spec.section.as_deref())?.clone();
    let raw = RawDataset::classify(value, spec.shape)?;
    let shape = raw.shape();
    let mut dataset = raw.normalize(&spec.text_field)?;

    if spec.strip_html {
        strip_dataset_html(&mut dataset);
    }

    tracing::debug!(
        path = %spec.file.display(),
        %shape,
        entries = dataset.len(),
        orphans = dataset.orphans.len(),
        "loaded source"
    );
    Ok(dataset)
}

fn strip_dataset_html(dataset: &mut SourceDataset) {
    for entry in dataset.entries.values_mut() {
        match entry {
            Entry::Text(s) => *s = strip_html_tags(s),
            Entry::Record(map) => {
                for value in map.values_mut() {
                    if let Value::String(s) = value {
                        *s = strip_html_tags(s);
                    }
                }
            }
        }
    }
}
