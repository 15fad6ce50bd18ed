use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::FileSet;
use crate::base::FileId;
use crate::error::{Result, UsedError};

/// Read one document from disk.
///
/// A path that is not a regular file, cannot be read as UTF-8 or is empty
/// yields `ContentUnreadable`.
pub fn read_document(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(UsedError::unreadable(path, "not a file"));
    }

    let text = fs::read_to_string(path).map_err(|e| UsedError::unreadable(path, e.to_string()))?;
    if text.is_empty() {
        return Err(UsedError::unreadable(path, "file is empty"));
    }
    Ok(text)
}

/// Loads documents from disk into a [`FileSet`].
///
/// Directory traversal is left to the caller; the loader only reads the
/// paths it is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Read a single document and buffer it in `files`.
    pub fn load_file<P: Into<PathBuf>>(&self, path: P, files: &FileSet) -> Result<FileId> {
        let path = path.into();
        let text = read_document(&path)?;
        let id = files.insert(&path, text);
        tracing::debug!(path = %path.display(), file = %id, "loaded document");
        Ok(id)
    }

    /// Read many documents in parallel.
    ///
    /// Results are returned in input order; one unreadable path does not stop
    /// the others from loading.
    pub fn load_all(&self, paths: &[PathBuf], files: &FileSet) -> Vec<Result<FileId>> {
        let texts: Vec<_> = paths
            .par_iter()
            .map(|path| (path, read_document(path)))
            .collect();

        let results: Vec<_> = texts
            .into_iter()
            .map(|(path, text)| text.map(|text| files.insert(path, text)))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::debug!(
            requested = paths.len(),
            failed,
            "loaded documents"
        );
        results
    }
}
