//! Error handling for codescribe
//!
//! [`CollectError`] is the taxonomy of the collection engine. Only root-level
//! failures are ever returned as `Err` from a collection; everything else is
//! carried as a warning next to the collected records.
//!
//! [`CodescribeError`] is the crate-wide error used by the command-line
//! caller, wrapping collection, service and I/O failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::service::ServiceError;

/// Errors raised while collecting files from a directory tree
#[derive(Error, Debug)]
pub enum CollectError {
    /// The collection root is missing or is not a directory
    #[error("Invalid root {}: {reason}", .path.display())]
    InvalidRoot {
        /// Root path as supplied by the caller
        path: PathBuf,
        /// Why the root was rejected
        reason: String,
    },

    /// A directory could not be listed
    #[error("Could not read directory {}: {source}", .path.display())]
    DirectoryRead {
        /// Directory that failed to list
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A file could not be stat-ed or read as text
    #[error("Could not access {}: {source}", .path.display())]
    Access {
        /// File that was skipped
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A followed symlink points back to one of its ancestors
    #[error("Symlink loop at {} (points to {})", .path.display(), .ancestor.display())]
    SymlinkLoop {
        /// Symlink that closes the loop
        path: PathBuf,
        /// Ancestor directory it resolves to
        ancestor: PathBuf,
    },
}

impl CollectError {
    /// Path the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::InvalidRoot { path, .. }
            | Self::DirectoryRead { path, .. }
            | Self::Access { path, .. }
            | Self::SymlinkLoop { path, .. } => path,
        }
    }
}

// Allow `?` on collection results inside io::Result code paths
impl From<CollectError> for io::Error {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::DirectoryRead { source, .. } | CollectError::Access { source, .. } => source,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}

/// Global error type for codescribe operations
#[derive(Error, Debug)]
pub enum CodescribeError {
    /// Collection failed at the root
    #[error("Collection error: {0}")]
    Collect(#[from] CollectError),

    /// The documentation service failed
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized Result type for codescribe operations
pub type Result<T> = std::result::Result<T, CodescribeError>;

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error::CodescribeError::$error_type(format!($($arg)*)))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(n: i32) -> Result<i32> {
        crate::ensure!(n > 0, Config, "expected a positive number, got {}", n);
        Ok(n)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(check_positive(3).unwrap(), 3);

        let err = check_positive(-1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: expected a positive number, got -1"
        );
    }

    #[test]
    fn test_collect_error_path() {
        let err = CollectError::Access {
            path: PathBuf::from("src/lib.rs"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.path(), std::path::Path::new("src/lib.rs"));
        assert!(err.to_string().contains("src/lib.rs"));

        let wrapped = CodescribeError::from(err);
        assert!(wrapped.to_string().starts_with("Collection error:"));
    }
}
