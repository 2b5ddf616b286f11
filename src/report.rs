/*!
 * Reporting functionality for codescribe
 *
 * Renders a console summary of a collection run using the tabled library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::Collection;
use crate::utils::format_file_size;

/// Information about a collected file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Path relative to the root
    pub path: String,
    /// Content size in bytes
    pub bytes: u64,
    /// Number of lines
    pub lines: usize,
}

/// Statistics for one collection run
#[derive(Debug, Clone, Default)]
pub struct CollectionReport {
    /// Root that was collected
    pub root: String,
    /// Where the document was written, if it was
    pub output_file: Option<String>,
    /// Time taken end to end
    pub duration: Duration,
    /// Number of files collected
    pub files_collected: usize,
    /// Total bytes of collected content
    pub total_bytes: u64,
    /// Number of skipped directories and files
    pub warnings: usize,
    /// Details for each file
    pub file_details: Vec<FileReportInfo>,
}

impl CollectionReport {
    /// Build a report from a finished collection
    pub fn from_collection(root: impl Into<String>, collection: &Collection) -> Self {
        let file_details = collection
            .records
            .iter()
            .map(|record| FileReportInfo {
                path: record.relative_path().to_string_lossy().to_string(),
                bytes: record.len(),
                lines: record.content().lines().count(),
            })
            .collect();

        Self {
            root: root.into(),
            output_file: None,
            duration: Duration::default(),
            files_collected: collection.records.len(),
            total_bytes: collection.total_bytes(),
            warnings: collection.warnings.len(),
            file_details,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for collection results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Largest number of files listed individually
    const MAX_LISTED_FILES: usize = 10;

    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &CollectionReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &CollectionReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, where the file name is
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let tail: String = path
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }

    fn create_summary_table(&self, report: &CollectionReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "📂 Root".to_string(),
                value: report.root.clone(),
            },
            SummaryRow {
                key: "📄 Files Collected".to_string(),
                value: report.files_collected.to_string(),
            },
            SummaryRow {
                key: "📦 Total Size".to_string(),
                value: format_file_size(report.total_bytes),
            },
            SummaryRow {
                key: "⚠️ Skipped (unreadable)".to_string(),
                value: report.warnings.to_string(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
        ];

        if let Some(output_file) = &report.output_file {
            rows.push(SummaryRow {
                key: "📝 Documentation".to_string(),
                value: output_file.clone(),
            });
        }

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &CollectionReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: usize,

            #[tabled(rename = "Size")]
            size: String,
        }

        // Largest files first
        let mut files: Vec<&FileReportInfo> = report.file_details.iter().collect();
        files.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.path.cmp(&b.path)));

        let rows: Vec<FileRow> = files
            .into_iter()
            .take(Self::MAX_LISTED_FILES)
            .map(|info| FileRow {
                path: self.format_path(&info.path, 60),
                lines: info.lines,
                size: format_file_size(info.bytes),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &CollectionReport) -> String {
        let summary_table = self.create_summary_table(report);

        if report.file_details.is_empty() {
            return format!("✅  COLLECTION COMPLETE\n{}", summary_table);
        }

        let files_table = self.create_files_table(report);
        let files_title = if report.file_details.len() > Self::MAX_LISTED_FILES {
            "📋  TOP 10 LARGEST FILES"
        } else {
            "📋  COLLECTED FILES"
        };

        format!(
            "{}\n{}\n\n✅  COLLECTION COMPLETE\n{}",
            files_title, files_table, summary_table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;

    fn sample_collection(count: usize) -> Collection {
        Collection {
            records: (0..count)
                .map(|i| FileRecord::new(format!("src/file{}.rs", i), "x\n".repeat(i + 1)))
                .collect(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_report_from_collection() {
        let report = CollectionReport::from_collection("/work/app", &sample_collection(3));

        assert_eq!(report.files_collected, 3);
        assert_eq!(report.total_bytes, 2 + 4 + 6);
        assert_eq!(report.warnings, 0);
        assert_eq!(report.file_details[2].lines, 3);
    }

    #[test]
    fn test_console_report_lists_files() {
        let mut report = CollectionReport::from_collection("/work/app", &sample_collection(2));
        report.output_file = Some("/work/app/CODE_DOCUMENTATION.md".to_string());

        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);

        assert!(text.contains("📋  COLLECTED FILES"));
        assert!(text.contains("src/file0.rs"));
        assert!(text.contains("src/file1.rs"));
        assert!(text.contains("CODE_DOCUMENTATION.md"));
        assert!(text.contains("COLLECTION COMPLETE"));
    }

    #[test]
    fn test_console_report_caps_listing() {
        let report = CollectionReport::from_collection("/work/app", &sample_collection(15));

        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);

        assert!(text.contains("TOP 10 LARGEST FILES"));
        // file14 is the largest, file0 the smallest
        assert!(text.contains("src/file14.rs"));
        assert!(!text.contains("src/file0.rs"));
    }

    #[test]
    fn test_empty_report_has_summary_only() {
        let report = CollectionReport::from_collection("/work/empty", &Collection::default());

        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);

        assert!(text.starts_with("✅  COLLECTION COMPLETE"));
        assert!(!text.contains("File Path"));
    }

    #[test]
    fn test_format_path_truncates_from_the_left() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);

        assert_eq!(reporter.format_path("src/lib.rs", 60), "src/lib.rs");
        assert_eq!(reporter.format_path("abcdefghij", 8), "...fghij");
    }
}
