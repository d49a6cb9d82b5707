//! Content scanning: glob matching and bounded file reads.
//!
//! The scanner hands raw text to the extraction stage and nothing else; no
//! class-name parsing happens here. Files that cannot contribute (unreadable,
//! binary, oversized, or too slow to read) are skipped per file, never
//! failing the run.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::errors::{Error, Result};

const READ_CHUNK: usize = 64 * 1024;

/// Extensions that never contain scannable text; skipped without a read.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "avif", "ico", "bmp", "woff", "woff2", "ttf", "otf",
    "eot", "pdf", "zip", "gz", "tar", "wasm", "exe", "dll", "so", "dylib", "class", "jar", "mp3",
    "mp4", "webm", "ogg",
];

/// Per-file limits applied while scanning.
#[derive(Debug, Clone)]
pub struct ScanLimits {
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Wall-clock budget for reading a single file.
    pub file_timeout: Duration,
}

impl Default for ScanLimits {
    fn default() -> Self {
        ScanLimits {
            max_file_size: 10 * 1024 * 1024,
            file_timeout: Duration::from_secs(5),
        }
    }
}

/// Why a matched file contributed nothing to the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file could not be read.
    Unreadable(String),
    /// The content is not text.
    Binary,
    /// The file exceeds `max_file_size`.
    TooLarge(u64),
    /// Reading did not finish within `file_timeout`.
    TimedOut,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(message) => write!(f, "unreadable: {message}"),
            SkipReason::Binary => write!(f, "binary content"),
            SkipReason::TooLarge(size) => write!(f, "file size {size} bytes exceeds the limit"),
            SkipReason::TimedOut => write!(f, "read timed out"),
        }
    }
}

/// Non-fatal diagnostic recorded while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// A file selected for scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Expands the content patterns against `root`, in pattern order, with
/// alphabetical order within each pattern. Duplicate matches keep the first
/// pattern that produced them. Traversal errors become warnings, not
/// failures; invalid pattern syntax is a configuration error.
pub fn collect_files(patterns: &[String], root: &Path) -> Result<(Vec<SourceFile>, Vec<ScanWarning>)> {
    let mut files = Vec::new();
    let mut warnings = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pattern in patterns {
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            root.join(pattern).to_string_lossy().into_owned()
        };

        let entries = glob::glob(&full_pattern).map_err(|e| Error::Config {
            message: format!("invalid glob pattern '{pattern}': {e}"),
        })?;

        for entry in entries {
            match entry {
                Ok(path) => {
                    if path.is_dir() || has_binary_extension(&path) {
                        continue;
                    }
                    if !seen.insert(path.clone()) {
                        continue;
                    }
                    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                    files.push(SourceFile { path, size });
                }
                Err(err) => {
                    log::warn!("cannot traverse {}: {}", err.path().display(), err.error());
                    warnings.push(ScanWarning {
                        path: err.path().to_path_buf(),
                        reason: SkipReason::Unreadable(err.error().to_string()),
                    });
                }
            }
        }
    }

    Ok((files, warnings))
}

fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            BINARY_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reads a file to text under the configured limits. The deadline is
/// checked between chunks, so a slow or endless source (FIFOs, network
/// mounts) cannot stall the scan for more than one chunk past its budget.
pub fn read_file_bounded(path: &Path, limits: &ScanLimits) -> std::result::Result<String, SkipReason> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => return Err(SkipReason::Unreadable(e.to_string())),
    };
    if metadata.len() > limits.max_file_size {
        return Err(SkipReason::TooLarge(metadata.len()));
    }

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(SkipReason::Unreadable(e.to_string())),
    };

    let deadline = Instant::now() + limits.file_timeout;
    let mut bytes: Vec<u8> = Vec::with_capacity(metadata.len() as usize);
    let mut chunk = [0u8; READ_CHUNK];
    let mut sniffed = false;

    loop {
        if Instant::now() >= deadline {
            return Err(SkipReason::TimedOut);
        }
        let read = match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SkipReason::Unreadable(e.to_string())),
        };
        // NUL bytes in the first chunk mark the file as binary.
        if !sniffed {
            if chunk[..read].contains(&0) {
                return Err(SkipReason::Binary);
            }
            sniffed = true;
        }
        bytes.extend_from_slice(&chunk[..read]);
        if bytes.len() as u64 > limits.max_file_size {
            return Err(SkipReason::TooLarge(bytes.len() as u64));
        }
    }

    String::from_utf8(bytes).map_err(|_| SkipReason::Binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn collects_in_pattern_then_alphabetical_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.html", b"b");
        write(&dir, "a.html", b"a");
        write(&dir, "src/main.rs", b"fn main() {}");

        let patterns = vec!["src/**/*.rs".to_string(), "*.html".to_string()];
        let (files, warnings) = collect_files(&patterns, dir.path()).unwrap();

        assert!(warnings.is_empty());
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["main.rs", "a.html", "b.html"]);
    }

    #[test]
    fn duplicate_matches_collapse_to_one_entry() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.html", b"x");

        let patterns = vec!["*.html".to_string(), "index.*".to_string()];
        let (files, _) = collect_files(&patterns, dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("index.html"));
    }

    #[test]
    fn binary_extensions_are_not_collected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "logo.png", &[0x89, 0x50, 0x4e, 0x47]);
        write(&dir, "page.html", b"<div/>");

        let patterns = vec!["*".to_string()];
        let (files, warnings) = collect_files(&patterns, dir.path()).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("page.html"));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let patterns = vec!["[".to_string()];
        let err = collect_files(&patterns, dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn reads_text_within_limits() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "page.html", b"<div class=\"flex\"></div>");
        let text = read_file_bounded(&path, &ScanLimits::default()).unwrap();
        assert!(text.contains("flex"));
    }

    #[test]
    fn nul_bytes_mean_binary() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "blob.dat", &[b'a', 0, b'b']);
        let reason = read_file_bounded(&path, &ScanLimits::default()).unwrap_err();
        assert_eq!(reason, SkipReason::Binary);
    }

    #[test]
    fn invalid_utf8_means_binary() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "latin1.txt", &[0xffu8, 0xfe, b'x']);
        let reason = read_file_bounded(&path, &ScanLimits::default()).unwrap_err();
        assert_eq!(reason, SkipReason::Binary);
    }

    #[test]
    fn oversized_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "big.html", &vec![b'x'; 64]);
        let limits = ScanLimits {
            max_file_size: 16,
            ..ScanLimits::default()
        };
        let reason = read_file_bounded(&path, &limits).unwrap_err();
        assert!(matches!(reason, SkipReason::TooLarge(_)));
    }

    #[test]
    fn zero_timeout_trips_immediately() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "page.html", b"<div/>");
        let limits = ScanLimits {
            file_timeout: Duration::ZERO,
            ..ScanLimits::default()
        };
        let reason = read_file_bounded(&path, &limits).unwrap_err();
        assert_eq!(reason, SkipReason::TimedOut);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.html");
        let reason = read_file_bounded(&path, &ScanLimits::default()).unwrap_err();
        assert!(matches!(reason, SkipReason::Unreadable(_)));
    }
}
