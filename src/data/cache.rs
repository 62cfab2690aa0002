//! Per-process cache of parsed skill sheets, keyed by file contents.
//!
//! The key is the SHA-256 of the file bytes, so an edited file is a new entry
//! and an unchanged file is parsed at most once however often it is selected.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use super::loader::{load_bytes, SourceFormat};
use super::model::SkillMatrix;

/// Hex SHA-256 of a file's contents.
pub fn file_identity(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Debug)]
pub struct TableCache {
    sheet: String,
    entries: HashMap<String, Arc<SkillMatrix>>,
}

impl TableCache {
    /// A cache that reads `sheet` from workbooks.
    pub fn new(sheet: impl Into<String>) -> Self {
        TableCache {
            sheet: sheet.into(),
            entries: HashMap::new(),
        }
    }

    /// Return the parsed matrix for `path`, parsing it only on first sight of
    /// its contents.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<SkillMatrix>> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let key = file_identity(&bytes);

        if let Some(matrix) = self.entries.get(&key) {
            log::info!("Cache hit for {} ({})", path.display(), &key[..12]);
            return Ok(Arc::clone(matrix));
        }

        log::info!("Parsing {} ({})", path.display(), &key[..12]);
        let raw = load_bytes(&bytes, SourceFormat::from_path(path)?, &self.sheet)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        let matrix = Arc::new(
            SkillMatrix::from_raw(raw).with_context(|| format!("cannot parse {}", path.display()))?,
        );
        self.entries.insert(key, Arc::clone(&matrix));
        Ok(matrix)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
