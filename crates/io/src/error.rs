use std::fmt;
use std::path::{Path, PathBuf};

use mushaf_recon::ReconError;

#[derive(Debug)]
pub enum IoError {
    /// File could not be read.
    Read { path: PathBuf, message: String },
    /// Artifact could not be written.
    Write { path: PathBuf, message: String },
    /// File is not valid JSON.
    Json { path: PathBuf, message: String },
    /// JSON is valid but matches none of the dataset shapes, or a section is
    /// missing, or a value has an unsupported type.
    Shape(String),
    /// Key-level failure from the engine (malformed key, shape mismatch).
    Recon(ReconError),
}

impl IoError {
    pub(crate) fn read(path: &Path, e: impl fmt::Display) -> Self {
        Self::Read { path: path.to_path_buf(), message: e.to_string() }
    }

    pub(crate) fn write(path: &Path, e: impl fmt::Display) -> Self {
        Self::Write { path: path.to_path_buf(), message: e.to_string() }
    }

    pub(crate) fn json(path: &Path, e: impl fmt::Display) -> Self {
        Self::Json { path: path.to_path_buf(), message: e.to_string() }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
            Self::Json { path, message } => write!(f, "invalid JSON in {}: {message}", path.display()),
            Self::Shape(msg) => write!(f, "unsupported dataset shape: {msg}"),
            Self::Recon(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Recon(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReconError> for IoError {
    fn from(e: ReconError) -> Self {
        Self::Recon(e)
    }
}
