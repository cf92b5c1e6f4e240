use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::error::IoError;
use crate::load::read_json;

/// Parsed documents keyed by path, so a batch that reads several sections of
/// one file parses it once. Owned by the caller and dropped with the batch;
/// nothing is global.
#[derive(Debug, Default)]
pub struct DocumentCache {
    docs: HashMap<PathBuf, Arc<Value>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Value>, IoError> {
        if let Some(doc) = self.docs.get(path) {
            tracing::trace!(path = %path.display(), "document cache hit");
            return Ok(Arc::clone(doc));
        }
        let doc = Arc::new(read_json(path)?);
        self.docs.insert(path.to_path_buf(), Arc::clone(&doc));
        Ok(doc)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
