/*!
 * Configuration handling for codescribe
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::error::Result;
use crate::policy::{IgnorePolicy, MatchMode};
use crate::service::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::writer::DEFAULT_OUTPUT_FILE;
use crate::{bail, ensure};

/// Command-line arguments for codescribe
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "codescribe",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate documentation for a project from its source files",
    long_about = "Collects the relevant source files of a project, skipping dependency folders, build output, media and oversized files, and sends them to a documentation service. The returned document is written next to the sources."
)]
pub struct Args {
    /// Project directory to document
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Output file for the generated documentation (relative paths resolve inside the project)
    #[clap(long, short)]
    pub output: Option<String>,

    /// Documentation service endpoint
    #[clap(long, env = "CODESCRIBE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// JSON file with ignore policy overrides
    #[clap(long)]
    pub policy: Option<String>,

    /// Comma-separated directory tokens to exclude (replaces the defaults)
    #[clap(long, value_delimiter = ',')]
    pub exclude_dirs: Vec<String>,

    /// Comma-separated file extensions to exclude (replaces the defaults)
    #[clap(long, value_delimiter = ',')]
    pub exclude_exts: Vec<String>,

    /// Maximum file size in bytes
    #[clap(long)]
    pub max_file_size: Option<u64>,

    /// How directory tokens are matched against paths
    #[clap(long, value_enum)]
    pub match_mode: Option<MatchMode>,

    /// Follow symbolic links while walking
    #[clap(long)]
    pub follow_symlinks: bool,

    /// Collect and report only, without calling the service
    #[clap(long)]
    pub dry_run: bool,

    /// Open the generated document with the system's default application
    #[clap(long)]
    pub open: bool,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project directory to collect
    pub target_dir: PathBuf,

    /// Where the generated document is written
    pub output_file: PathBuf,

    /// Documentation service endpoint
    pub endpoint: String,

    /// Request timeout
    pub timeout: Duration,

    /// Resolved ignore policy
    pub policy: IgnorePolicy,

    /// Whether to follow symbolic links
    pub follow_symlinks: bool,

    /// Skip the service call
    pub dry_run: bool,

    /// Open the written document afterwards
    pub open_document: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    ///
    /// The ignore policy starts from the defaults, then the `--policy` file,
    /// then individual flags.
    pub fn from_args(args: Args) -> Result<Self> {
        let target_dir = PathBuf::from(&args.directory_path);
        let output_file = resolve_output(&target_dir, args.output.as_deref());

        let mut policy = match &args.policy {
            Some(path) => {
                let path = Path::new(path);
                ensure!(path.is_file(), Config, "Policy file not found: {}", path.display());
                IgnorePolicy::from_json_file(path)?
            }
            None => IgnorePolicy::default(),
        };

        if !args.exclude_dirs.is_empty() {
            policy = policy.with_excluded_dirs(args.exclude_dirs);
        }
        if !args.exclude_exts.is_empty() {
            policy = policy.with_excluded_extensions(args.exclude_exts);
        }
        if let Some(max_file_size) = args.max_file_size {
            policy = policy.with_max_file_size(max_file_size);
        }
        if let Some(match_mode) = args.match_mode {
            policy = policy.with_match_mode(match_mode);
        }

        Ok(Self {
            target_dir,
            output_file,
            endpoint: args.endpoint,
            timeout: Duration::from_secs(args.timeout),
            policy,
            follow_symlinks: args.follow_symlinks,
            dry_run: args.dry_run,
            open_document: args.open,
        })
    }

    /// Validate the configuration
    ///
    /// The target directory is checked by the collector itself so that a bad
    /// root surfaces as a collection error.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.timeout > Duration::ZERO, Config, "Timeout must be at least one second");

        if !self.dry_run
            && !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://"))
        {
            bail!(Config, "Endpoint must be an http(s) URL: {}", self.endpoint);
        }

        // Check if output file directory exists; a missing root is reported by
        // the collector instead
        if self.dry_run || !self.target_dir.is_dir() {
            return Ok(());
        }
        if let Some(parent) = self.output_file.parent() {
            ensure!(
                parent.as_os_str().is_empty() || parent.exists(),
                Config,
                "Output directory not found: {}",
                parent.display()
            );
        }

        Ok(())
    }
}

fn resolve_output(target_dir: &Path, output: Option<&str>) -> PathBuf {
    match output {
        Some(output) => {
            let path = PathBuf::from(output);
            if path.is_absolute() {
                path
            } else {
                target_dir.join(path)
            }
        }
        None => target_dir.join(DEFAULT_OUTPUT_FILE),
    }
}
