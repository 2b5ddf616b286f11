/*!
 * Persists generated documentation
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

/// Default output file name, placed in the project root
pub const DEFAULT_OUTPUT_FILE: &str = "CODE_DOCUMENTATION.md";

/// Writes a generated document to disk
pub struct DocumentWriter {
    /// Destination path
    output_file: PathBuf,
}

impl DocumentWriter {
    /// Create a writer targeting `output_file`
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
        }
    }

    /// Destination path
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Write the document exactly as given, replacing any previous one, and
    /// return its path
    pub fn write(&self, document: &str) -> io::Result<&Path> {
        let file = File::create(&self.output_file)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(document.as_bytes())?;
        writer.flush()?;

        info!(path = %self.output_file.display(), bytes = document.len(), "documentation written");

        Ok(&self.output_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_document() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join(DEFAULT_OUTPUT_FILE);
        let writer = DocumentWriter::new(&path);

        let written = writer.write("# Project\n\nOverview")?;

        assert_eq!(written, path.as_path());
        assert_eq!(fs::read_to_string(&path)?, "# Project\n\nOverview");

        Ok(())
    }

    #[test]
    fn test_write_replaces_previous_document() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("docs.md");
        fs::write(&path, "stale content that is much longer than the new one\n")?;

        DocumentWriter::new(&path).write("fresh\n")?;

        assert_eq!(fs::read_to_string(&path)?, "fresh\n");

        Ok(())
    }

    #[test]
    fn test_document_bytes_are_unchanged() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("docs.md");
        let document = "# Title\r\n\n  trailing spaces  \n\n\n";

        DocumentWriter::new(&path).write(document)?;

        assert_eq!(fs::read(&path)?, document.as_bytes());

        Ok(())
    }

    #[test]
    fn test_missing_parent_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing").join("docs.md");

        let err = DocumentWriter::new(&path).write("x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
