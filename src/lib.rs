pub mod animation;
pub mod args;
pub mod config;
pub mod emitter;
pub mod errors;
pub mod extract;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod theme;

pub use animation::{AnimationDefinition, AnimationRegistry, KeyframeBody, KeyframeTable};
pub use args::{BuildArgs, Cli, Commands, PipeArgs};
pub use config::{Config, ContentConfig, ThemeConfig};
pub use emitter::{emit, EmitOptions};
pub use errors::{Error, Result};
pub use extract::Extractor;
pub use report::{Report, ReportBuilder};
pub use resolver::{resolve, Declaration, ResolvedRule, UtilityRegistry};
pub use scanner::{
    collect_files, read_file_bounded, ScanLimits, ScanWarning, SkipReason, SourceFile,
};
pub use theme::TokenSet;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};

/// Cooperative cancellation flag shared with a running pipeline. Cloning
/// hands out another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the pipeline to stop at its next checkpoint. A cancelled run
    /// returns `Error::Cancelled` and produces no output.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Extension hooks a caller may hand to a run. Both default to no-ops, so
/// a plugin implements only what it contributes.
pub trait Plugin: Send + Sync {
    /// Register additional static utilities (full class name → declarations).
    fn register_utilities(&self, _utilities: &mut UtilityRegistry) {}

    /// Register additional keyframe bodies by base name.
    fn register_animations(&self, _keyframes: &mut KeyframeTable) {}
}

/// Options controlling one generation run.
pub struct RunOptions {
    /// Directory the content patterns are resolved against.
    pub root: PathBuf,
    /// Scanning thread count; `None` keeps the rayon default.
    pub jobs: Option<usize>,
    pub minify: bool,
    pub limits: ScanLimits,
    pub cancel: CancelToken,
    pub plugins: Vec<Box<dyn Plugin>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            jobs: None,
            minify: false,
            limits: ScanLimits::default(),
            cancel: CancelToken::new(),
            plugins: Vec::new(),
        }
    }
}

/// Counters describing a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Files selected by the content patterns.
    pub files_matched: usize,
    /// Files read and scanned for candidates.
    pub files_scanned: usize,
    /// Matched files that were skipped.
    pub files_skipped: usize,
    /// Candidate tokens seen before resolution.
    pub candidates_seen: usize,
    /// Unique class names that resolved to rules.
    pub classes_matched: usize,
    /// Size of the generated stylesheet in bytes.
    pub css_size_bytes: usize,
    pub elapsed: Duration,
}

/// Where one resolved class was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUsage {
    /// Occurrences across all scanned files.
    pub count: usize,
    /// Files containing the class, in scan order.
    pub files: Vec<PathBuf>,
}

/// Result of a generation run.
#[derive(Debug)]
pub struct RunOutput {
    /// The generated stylesheet. Byte-identical across runs for identical
    /// input, whatever order files were scanned in.
    pub css: String,
    /// Files that matched but could not contribute, with reasons. Binary
    /// files are skipped silently and not listed here.
    pub warnings: Vec<ScanWarning>,
    /// Resolved classes in scan discovery order.
    pub classes: IndexMap<String, ClassUsage>,
    pub stats: RunStats,
}

/// Run the full pipeline: validate, merge tokens, scan, resolve, emit.
///
/// This is the single library entry point; everything the CLI does goes
/// through here. Scanner warnings are surfaced in the output rather than
/// failing the run.
pub fn run(config: &Config, options: &RunOptions) -> Result<RunOutput> {
    run_with_progress(config, options, None)
}

/// Same as [`run`], reporting per-file progress to `progress` if given.
pub fn run_with_progress(
    config: &Config,
    options: &RunOptions,
    progress: Option<&ProgressBar>,
) -> Result<RunOutput> {
    let started = Instant::now();

    config.validate()?;
    let tokens = TokenSet::defaults().merge(&config.theme.extend)?;
    let animations = AnimationRegistry::from_tokens(&tokens, &options.plugins)?;
    let mut utilities = UtilityRegistry::default();
    for plugin in &options.plugins {
        plugin.register_utilities(&mut utilities);
    }

    if options.cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let (files, mut warnings) = scanner::collect_files(&config.content.files, &options.root)?;
    let files_matched = files.len();
    log::info!(
        "scanning {} files from {} patterns",
        files_matched,
        config.content.files.len()
    );

    if let Some(pb) = progress {
        pb.set_length(files.len() as u64);
    }

    let scanned = scan_files(&files, options, progress);
    if options.cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    // Resolution runs in collection order so dedupe-by-first-occurrence is
    // stable no matter how the parallel scan interleaved.
    let mut rules: Vec<ResolvedRule> = Vec::new();
    let mut classes: IndexMap<String, ClassUsage> = IndexMap::new();
    let mut candidates_seen = 0usize;
    let mut files_scanned = 0usize;
    let mut files_skipped = 0usize;

    for (file, outcome) in files.iter().zip(scanned) {
        match outcome {
            Ok(candidates) => {
                files_scanned += 1;
                candidates_seen += candidates.len();
                for candidate in &candidates {
                    if let Some(rule) = resolver::resolve(candidate, &tokens, &animations, &utilities)
                    {
                        let usage = classes.entry(rule.class_name.clone()).or_insert_with(|| {
                            ClassUsage {
                                count: 0,
                                files: Vec::new(),
                            }
                        });
                        usage.count += 1;
                        if !usage.files.contains(&file.path) {
                            usage.files.push(file.path.clone());
                        }
                        rules.push(rule);
                    }
                }
            }
            Err(SkipReason::Binary) => {
                files_skipped += 1;
                log::debug!("skipping binary file {}", file.path.display());
            }
            Err(reason) => {
                files_skipped += 1;
                log::warn!("skipping {}: {}", file.path.display(), reason);
                warnings.push(ScanWarning {
                    path: file.path.clone(),
                    reason,
                });
            }
        }
    }

    let css = emitter::emit(
        &rules,
        &animations,
        &EmitOptions {
            minify: options.minify,
        },
    );

    let stats = RunStats {
        files_matched,
        files_scanned,
        files_skipped,
        candidates_seen,
        classes_matched: classes.len(),
        css_size_bytes: css.len(),
        elapsed: started.elapsed(),
    };
    log::info!(
        "generated {} bytes of CSS for {} classes in {:.1?}",
        stats.css_size_bytes,
        stats.classes_matched,
        stats.elapsed
    );

    Ok(RunOutput {
        css,
        warnings,
        classes,
        stats,
    })
}

/// Read and extract candidates from every file, in parallel. The returned
/// vector is aligned with `files`; rayon's indexed collect preserves input
/// order regardless of completion order.
fn scan_files(
    files: &[SourceFile],
    options: &RunOptions,
    progress: Option<&ProgressBar>,
) -> Vec<std::result::Result<Vec<String>, SkipReason>> {
    use rayon::prelude::*;
    use std::sync::atomic::AtomicUsize;

    if let Some(jobs) = options.jobs {
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global();
    }

    let extractor = Extractor::new();
    let processed = AtomicUsize::new(0);

    files
        .par_iter()
        .map(|file| {
            // A cancelled run discards everything, so skip the read and let
            // the driver's post-scan check surface the cancellation.
            if options.cancel.is_cancelled() {
                return Ok(Vec::new());
            }

            let outcome = scanner::read_file_bounded(&file.path, &options.limits)
                .map(|text| extractor.candidates(&text).map(str::to_owned).collect());

            if let Some(pb) = progress {
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                pb.set_position(done as u64);
                let name = file
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                pb.set_message(name);
            }

            outcome
        })
        .collect()
}

/// Run the build subcommand: load config, generate, write outputs.
pub fn build(args: &BuildArgs) -> Result<RunOutput> {
    args.validate().map_err(|message| Error::Config { message })?;

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if !args.input.is_empty() {
        config.content.files = args.input.clone();
    }

    let options = RunOptions {
        root: args.root.clone(),
        jobs: args.jobs,
        minify: args.minify,
        limits: ScanLimits {
            max_file_size: args.max_file_size,
            file_timeout: Duration::from_millis(args.timeout_ms),
        },
        cancel: CancelToken::new(),
        plugins: Vec::new(),
    };

    let progress_bar = if args.verbose {
        None
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb.set_message("Collecting files...");
        Some(pb)
    };

    let output = run_with_progress(&config, &options, progress_bar.as_ref())?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!(
            "✓ {} classes, {} bytes",
            output.stats.classes_matched, output.stats.css_size_bytes
        ));
    }

    if !args.dry_run {
        write_outputs(args, &output)?;
    }

    Ok(output)
}

/// Handle the pipe subcommand: read text from stdin, write generated CSS
/// to stdout. No file scanning; the input stream is the content.
pub async fn handle_pipe(args: &PipeArgs) -> Result<()> {
    use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

    let mut input = String::new();
    let mut stdin = io::stdin();
    stdin.read_to_string(&mut input).await?;

    // Empty input produces empty output, not an error.
    if input.trim().is_empty() {
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let tokens = TokenSet::defaults().merge(&config.theme.extend)?;
    let animations = AnimationRegistry::from_tokens(&tokens, &[])?;
    let utilities = UtilityRegistry::default();
    let extractor = Extractor::new();

    let mut rules = Vec::new();
    for candidate in extractor.candidates(&input) {
        if let Some(rule) = resolver::resolve(candidate, &tokens, &animations, &utilities) {
            rules.push(rule);
        }
    }

    let css = emitter::emit(
        &rules,
        &animations,
        &EmitOptions {
            minify: args.minify,
        },
    );

    let mut stdout = io::stdout();
    stdout.write_all(css.as_bytes()).await.map_err(|e| Error::Output {
        path: "stdout".to_string(),
        message: e.to_string(),
    })?;
    stdout.flush().await.map_err(|e| Error::Output {
        path: "stdout".to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}

/// Write the stylesheet and, if requested, the JSON report.
fn write_outputs(args: &BuildArgs, output: &RunOutput) -> Result<()> {
    ensure_parent_dir(&args.output)?;
    write_atomic(&args.output, &output.css).map_err(|e| Error::Output {
        path: args.output.display().to_string(),
        message: e.to_string(),
    })?;
    log::info!(
        "wrote {} ({} bytes)",
        args.output.display(),
        output.css.len()
    );

    if let Some(report_path) = &args.report {
        ensure_parent_dir(report_path)?;
        let report = ReportBuilder::new()
            .with_classes(&output.classes)
            .with_warnings(&output.warnings)
            .with_stats(&output.stats, args.minify)
            .build();
        let content = report.to_pretty_json()?;
        write_atomic(report_path, &content).map_err(|e| Error::Output {
            path: report_path.display().to_string(),
            message: e.to_string(),
        })?;
        log::info!("wrote report {}", report_path.display());
    }

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write file atomically by writing to a temp file then renaming, so a
/// crashed run never leaves a truncated stylesheet behind.
fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> std::io::Result<()> {
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}
