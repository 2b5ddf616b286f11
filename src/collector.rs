/*!
 * Directory walking and file collection
 */

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::CollectError;
use crate::policy::IgnorePolicy;
use crate::types::{Collection, FileRecord};

/// Collects qualifying files below a root directory
///
/// The collector only holds its policy, so one instance can serve any number
/// of concurrent collections; each call owns its own traversal state.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    policy: IgnorePolicy,
    follow_symlinks: bool,
}

impl Collector {
    /// Create a collector with the given policy
    pub fn new(policy: IgnorePolicy) -> Self {
        Self {
            policy,
            follow_symlinks: false,
        }
    }

    /// Descend into symlinked directories and read symlinked files
    ///
    /// Symlinks pointing back to an ancestor are reported as
    /// [`CollectError::SymlinkLoop`] warnings instead of being followed.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Policy in use
    pub fn policy(&self) -> &IgnorePolicy {
        &self.policy
    }

    /// Walk `root` and gather every qualifying file
    ///
    /// Only a missing, non-directory or unlistable root is an error; every
    /// other failure ends up in [`Collection::warnings`].
    pub fn collect(&self, root: impl AsRef<Path>) -> Result<Collection, CollectError> {
        let mut collection = Collection::default();

        for item in self.records(root.as_ref())? {
            match item {
                Ok(record) => collection.records.push(record),
                Err(e) => collection.warnings.push(e),
            }
        }

        debug!(
            files = collection.records.len(),
            warnings = collection.warnings.len(),
            "collection finished"
        );

        Ok(collection)
    }

    /// Lazily walk `root`, yielding records and non-fatal errors as they occur
    ///
    /// Dropping the iterator abandons the traversal.
    pub fn records<'a>(&'a self, root: &Path) -> Result<Records<'a>, CollectError> {
        let metadata = fs::metadata(root).map_err(|e| CollectError::InvalidRoot {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !metadata.is_dir() {
            return Err(CollectError::InvalidRoot {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        // An unlistable root is the one directory failure that is fatal
        fs::read_dir(root).map_err(|source| CollectError::DirectoryRead {
            path: root.to_path_buf(),
            source,
        })?;

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_symlinks)
            .into_iter();

        Ok(Records {
            policy: &self.policy,
            root: root.to_path_buf(),
            current_dir: root.to_path_buf(),
            walker,
        })
    }
}

/// Depth-first, pre-order iterator over a collection root
///
/// Entries are visited in the order the filesystem lists them.
pub struct Records<'a> {
    policy: &'a IgnorePolicy,
    root: PathBuf,
    /// Last directory handed out by the walker
    current_dir: PathBuf,
    walker: walkdir::IntoIter,
}

impl Records<'_> {
    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Map a walk failure to the collection taxonomy
    ///
    /// `walkdir` opens a directory right after yielding its entry and reports
    /// a failed listing as the next item, so an error on the last yielded
    /// directory is a listing failure. Anything else is an entry that could
    /// not be inspected.
    fn walk_error(&self, err: walkdir::Error) -> CollectError {
        if let Some(ancestor) = err.loop_ancestor() {
            return CollectError::SymlinkLoop {
                ancestor: ancestor.to_path_buf(),
                path: err.path().map_or_else(|| self.current_dir.clone(), Path::to_path_buf),
            };
        }

        let (path, listing) = match err.path() {
            Some(path) => (path.to_path_buf(), path == self.current_dir),
            // Failures while iterating an open listing carry no path
            None => (self.current_dir.clone(), true),
        };

        let source = io::Error::from(err);
        if listing {
            CollectError::DirectoryRead { path, source }
        } else {
            CollectError::Access { path, source }
        }
    }

    /// Read one candidate file, checking type and size on the open handle
    fn read_record(&self, path: &Path, relative_path: PathBuf) -> Result<Option<FileRecord>, CollectError> {
        let access = |source: io::Error| CollectError::Access {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(access)?;
        let metadata = file.metadata().map_err(access)?;

        if !metadata.is_file() {
            return Ok(None);
        }

        if self.policy.exceeds_size_limit(metadata.len()) {
            debug!(path = %relative_path.display(), size = metadata.len(), "skipping oversized file");
            return Ok(None);
        }

        let mut bytes = Vec::with_capacity(metadata.len() as usize);
        file.take(self.policy.max_file_size.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(access)?;

        // The file may have grown since it was stat-ed
        if self.policy.exceeds_size_limit(bytes.len() as u64) {
            debug!(path = %relative_path.display(), "skipping file that grew past the size limit");
            return Ok(None);
        }

        let content = String::from_utf8(bytes)
            .map_err(|e| access(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        Ok(Some(FileRecord::new(relative_path, content)))
    }
}

impl Iterator for Records<'_> {
    type Item = Result<FileRecord, CollectError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let err = self.walk_error(err);
                    warn!("{}", err);
                    return Some(Err(err));
                }
            };

            // Rules see the path below the root, never the root's own ancestors
            let relative_path = self.relative(entry.path());
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if self.policy.excludes_dir(&relative_path) {
                    debug!(path = %relative_path.display(), "pruning excluded directory");
                    self.walker.skip_current_dir();
                } else {
                    self.current_dir = entry.path().to_path_buf();
                }
                continue;
            }

            if !file_type.is_file() {
                debug!(path = %relative_path.display(), "skipping non-regular entry");
                continue;
            }

            if self.policy.excludes_file_name(&relative_path) {
                continue;
            }

            match self.read_record(entry.path(), relative_path) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(err) => {
                    warn!("{}", err);
                    return Some(Err(err));
                }
            }
        }
    }
}
