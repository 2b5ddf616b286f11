/*!
 * Ignore policy deciding which paths take part in a collection
 */

use std::fs;
use std::path::{Component, Path};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CollectError;

/// Directory tokens excluded by default
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "__pycache__", "dist", "build"];

/// File extensions excluded by default
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[
    ".log", ".tmp", ".png", ".jpg", ".jpeg", ".gif", ".pdf", ".md",
];

/// Default maximum file size in bytes (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// How directory tokens are matched against a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A token anywhere in the path excludes it, even inside a file name
    #[default]
    Substring,
    /// A token must equal a whole path component
    Segment,
}

/// Rules that exclude paths from a collection
///
/// Comparisons are case-insensitive. A file is excluded when it is strictly
/// larger than `max_file_size`; a file of exactly `max_file_size` bytes is
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnorePolicy {
    /// Directory name tokens
    pub excluded_dirs: Vec<String>,
    /// File extension suffixes, including the leading dot
    pub excluded_extensions: Vec<String>,
    /// Maximum file size in bytes
    pub max_file_size: u64,
    /// Matching strategy for directory tokens
    pub match_mode: MatchMode,
}

impl Default for IgnorePolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXCLUDED_DIRS.iter().copied(),
            DEFAULT_EXCLUDED_EXTENSIONS.iter().copied(),
            DEFAULT_MAX_FILE_SIZE,
        )
    }
}

impl IgnorePolicy {
    /// Create a policy from explicit rule sets
    pub fn new<D, E>(excluded_dirs: D, excluded_extensions: E, max_file_size: u64) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            excluded_dirs: excluded_dirs.into_iter().map(Into::into).collect(),
            excluded_extensions: excluded_extensions.into_iter().map(Into::into).collect(),
            max_file_size,
            match_mode: MatchMode::default(),
        }
    }

    /// Load a policy from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> crate::error::Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Replace the directory tokens
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the excluded extensions
    pub fn with_excluded_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the size limit
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Set the matching strategy for directory tokens
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /// Check whether a path is excluded by any rule
    ///
    /// Name rules match against `path` as given, while the size rule stats
    /// it. The collector applies the same name rules to paths relative to the
    /// collection root (see [`IgnorePolicy::excludes_dir`] and
    /// [`IgnorePolicy::excludes_file_name`]), so directories above the root
    /// never exclude anything.
    ///
    /// Name rules are evaluated first. Only when they pass is the entry
    /// stat-ed for the size rule, which fails with [`CollectError::Access`]
    /// if the entry vanished or cannot be inspected.
    pub fn is_excluded(&self, path: &Path) -> Result<bool, CollectError> {
        if self.excludes_file_name(path) {
            return Ok(true);
        }

        let metadata = fs::metadata(path).map_err(|source| CollectError::Access {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(metadata.is_file() && self.exceeds_size_limit(metadata.len()))
    }

    /// Directory rule only, used to decide whether to descend
    pub fn excludes_dir(&self, path: &Path) -> bool {
        self.matches_dir_token(path)
    }

    /// Directory rule plus extension rule, without touching the filesystem
    pub fn excludes_file_name(&self, path: &Path) -> bool {
        self.matches_dir_token(path) || self.matches_extension(path)
    }

    /// True when the path contains one of the directory tokens
    pub fn matches_dir_token(&self, path: &Path) -> bool {
        match self.match_mode {
            MatchMode::Substring => {
                let normalized = normalize(path);
                self.excluded_dirs
                    .iter()
                    .filter(|token| !token.is_empty())
                    .any(|token| normalized.contains(&token.to_lowercase()))
            }
            MatchMode::Segment => path.components().any(|component| match component {
                Component::Normal(name) => {
                    let name = name.to_string_lossy().to_lowercase();
                    self.excluded_dirs
                        .iter()
                        .any(|token| token.to_lowercase() == name)
                }
                _ => false,
            }),
        }
    }

    /// True when the path ends with one of the excluded extensions
    pub fn matches_extension(&self, path: &Path) -> bool {
        let normalized = normalize(path);
        self.excluded_extensions
            .iter()
            .filter(|ext| !ext.is_empty())
            .any(|ext| normalized.ends_with(&ext.to_lowercase()))
    }

    /// True when a file of `len` bytes is over the limit
    pub fn exceeds_size_limit(&self, len: u64) -> bool {
        len > self.max_file_size
    }
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}
