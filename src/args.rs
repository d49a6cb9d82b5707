use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Utility CSS generator - scans content files and emits the classes they use
#[derive(Parser, Debug)]
#[command(name = "windgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan content files and generate a stylesheet
    Build(BuildArgs),
    /// Read content from stdin and write generated CSS to stdout
    Pipe(PipeArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Configuration file path (JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Path to configuration file (JSON format)"
    )]
    pub config: Option<PathBuf>,

    /// Content file patterns (glob patterns supported)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATTERN",
        num_args = 1..,
        help = "Content patterns to scan; overrides the config file's content.files"
    )]
    pub input: Vec<String>,

    /// Output CSS file path
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        required = true,
        help = "Path where the generated CSS file will be written"
    )]
    pub output: PathBuf,

    /// Output report file path (JSON)
    #[arg(
        long = "report",
        value_name = "PATH",
        help = "Path where a JSON usage report will be written"
    )]
    pub report: Option<PathBuf>,

    /// Directory content patterns are resolved against
    #[arg(
        long = "root",
        value_name = "DIR",
        default_value = ".",
        help = "Directory content patterns are resolved against"
    )]
    pub root: PathBuf,

    /// Enable CSS minification
    #[arg(
        long = "minify",
        default_value_t = false,
        help = "Enable minification of the output CSS"
    )]
    pub minify: bool,

    /// Number of parallel threads to use
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "NUM",
        help = "Number of scanning threads to use (defaults to number of CPU cores)"
    )]
    pub jobs: Option<usize>,

    /// Per-file read deadline in milliseconds
    #[arg(
        long = "timeout",
        value_name = "MS",
        default_value_t = 5000,
        help = "Per-file read deadline in milliseconds; slower files are skipped"
    )]
    pub timeout_ms: u64,

    /// Maximum file size in bytes
    #[arg(
        long = "max-file-size",
        value_name = "BYTES",
        default_value_t = 10 * 1024 * 1024,
        help = "Files larger than this are skipped"
    )]
    pub max_file_size: u64,

    /// Dry run (don't write output files)
    #[arg(
        long = "dry-run",
        default_value_t = false,
        help = "Run the full pipeline but don't write output files"
    )]
    pub dry_run: bool,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose logging instead of the progress bar"
    )]
    pub verbose: bool,
}

/// Arguments for the pipe command
#[derive(Parser, Debug, Clone)]
pub struct PipeArgs {
    /// Configuration file path (JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Path to configuration file (JSON format); only the theme is used"
    )]
    pub config: Option<PathBuf>,

    /// Enable CSS minification
    #[arg(
        long = "minify",
        default_value_t = false,
        help = "Enable minification of the output CSS"
    )]
    pub minify: bool,
}

impl BuildArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        // Content patterns come from --input or from the config file
        if self.input.is_empty() && self.config.is_none() {
            return Err(
                "No content patterns: provide --input or a config file with content.files"
                    .to_string(),
            );
        }

        // Check that output paths are not the same
        if let Some(report) = &self.report {
            if &self.output == report {
                return Err("Output CSS and report paths must be different".to_string());
            }
        }

        // Validate number of jobs if specified
        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err("Number of jobs must be at least 1".to_string());
            }
        }

        Ok(())
    }
}
