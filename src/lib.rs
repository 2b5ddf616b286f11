/*!
 * codescribe - Collect project sources for documentation generation
 *
 * This library walks a project directory, drops dependency folders, build
 * output, media and oversized files, and returns the remaining files as
 * (relative path, text) records ready to be sent to a documentation service.
 */

pub mod collector;
pub mod config;
pub mod error;
pub mod policy;
pub mod report;
pub mod service;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use collector::{Collector, Records};
pub use config::Config;
pub use error::{CodescribeError, CollectError, Result};
pub use policy::{IgnorePolicy, MatchMode};
pub use report::{CollectionReport, ReportFormat, Reporter};
pub use service::{DocumentService, HttpDocumentService, ServiceError};
pub use types::{Collection, FileRecord};
pub use utils::format_file_size;
pub use writer::DocumentWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
