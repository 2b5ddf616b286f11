/*!
 * Core types produced by a collection
 */

use std::path::{Path, PathBuf};

use crate::error::CollectError;

/// A collected file: its path relative to the collection root and its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    relative_path: PathBuf,
    content: String,
}

impl FileRecord {
    /// Create a record
    pub fn new(relative_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Path relative to the collection root
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Decoded text content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content size in bytes
    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    /// Whether the file was empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Take ownership of the path and content
    pub fn into_parts(self) -> (PathBuf, String) {
        (self.relative_path, self.content)
    }
}

/// Result of walking one root
///
/// `warnings` holds every subtree or file that was skipped because it could
/// not be read. An empty `records` list is a valid outcome.
#[derive(Debug, Default)]
pub struct Collection {
    /// Collected files in traversal order
    pub records: Vec<FileRecord>,
    /// Non-fatal failures encountered on the way
    pub warnings: Vec<CollectError>,
}

impl Collection {
    /// Whether no file qualified
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total bytes of collected content
    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(FileRecord::len).sum()
    }

    /// Relative paths, sorted, for order-insensitive comparison
    pub fn sorted_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .records
            .iter()
            .map(|record| record.relative_path().to_path_buf())
            .collect();
        paths.sort();
        paths
    }
}
