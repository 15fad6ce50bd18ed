//! In-memory set of source documents keyed by [`FileId`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::base::FileId;
use crate::error::{Result, UsedError};

/// Path ↔ [`FileId`] mapping plus the buffered text of each document.
///
/// Ids are stable: a path keeps its id for the lifetime of the set.
/// The set is shared between threads in batch mode, so all access goes
/// through an internal lock.
#[derive(Debug, Default)]
pub struct FileSet {
    inner: RwLock<FileSetInner>,
}

#[derive(Debug, Default)]
struct FileSetInner {
    path_to_id: IndexMap<PathBuf, FileId>,
    id_to_path: IndexMap<FileId, PathBuf>,
    contents: IndexMap<FileId, Arc<str>>,
    next_id: u32,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or assign the id of `path`.
    pub fn file_id(&self, path: &Path) -> FileId {
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.path_to_id.get(path) {
                return id;
            }
        }

        let mut inner = self.inner.write();
        // Another writer may have won the race.
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(path.to_owned(), id);
        inner.id_to_path.insert(id, path.to_owned());
        id
    }

    /// Register `path` with its text in one step.
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<Arc<str>>) -> FileId {
        let id = self.file_id(path.as_ref());
        self.set_contents(id, contents);
        id
    }

    pub fn path(&self, file: FileId) -> Option<PathBuf> {
        self.inner.read().id_to_path.get(&file).cloned()
    }

    /// Replace the buffered text of a document.
    pub fn set_contents(&self, file: FileId, contents: impl Into<Arc<str>>) {
        self.inner.write().contents.insert(file, contents.into());
    }

    pub fn contents(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().contents.get(&file).cloned()
    }

    /// The text of a document, or `ContentUnreadable` if it has none.
    ///
    /// Empty text counts as unreadable: there is nothing to analyze.
    pub fn require_contents(&self, file: FileId) -> Result<Arc<str>> {
        let inner = self.inner.read();
        let path = || {
            inner
                .id_to_path
                .get(&file)
                .cloned()
                .unwrap_or_else(|| PathBuf::from(file.to_string()))
        };

        match inner.contents.get(&file) {
            Some(text) if !text.is_empty() => Ok(Arc::clone(text)),
            Some(_) => Err(UsedError::unreadable(path(), "file is empty")),
            None => Err(UsedError::unreadable(path(), "no content loaded")),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().path_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All ids, in registration order.
    pub fn files(&self) -> Vec<FileId> {
        self.inner.read().id_to_path.keys().copied().collect()
    }
}
