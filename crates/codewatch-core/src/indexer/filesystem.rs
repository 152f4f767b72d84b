//! Source-file discovery for extraction passes.

use std::path::{Path, PathBuf};

use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::errors::{CodewatchError, CodewatchResult};

/// Per-directory ignore file, gitignore syntax.
pub const IGNORE_FILE_NAME: &str = ".codewatchignore";

/// Directories never worth descending into.
const IMPLICIT_IGNORED_DIRS: &[&str] = &[".git", "vendor", "node_modules", "target", "build"];

const DEFAULT_SENSITIVE_EXCLUDE_PATTERNS: &[&str] = &[
    ".env",
    ".env.*",
    "*.pem",
    "*.key",
    "*.p12",
    "*secret*",
    "*secrets*",
    "*credential*",
    "id_rsa",
    "id_dsa",
];

/// A file selected for detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub absolute_path: PathBuf,
    /// Path relative to the codebase root.
    pub relative_path: PathBuf,
    pub size_bytes: u64,
}

/// Outcome of a discovery walk.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Every regular file the walker visited, before extension filtering.
    pub files_seen: usize,
    /// Matching source files, sorted by relative path.
    pub files: Vec<SourceFile>,
}

/// Lowercased extension of `path`, if any.
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// `path` relative to `root`, byte-for-byte; non-UTF-8 names are kept as is.
fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

fn build_overrides(root: &Path, config: &ExtractorConfig) -> CodewatchResult<Override> {
    let mut overrides = OverrideBuilder::new(root);
    let mut add = |glob: String| -> CodewatchResult<()> {
        overrides
            .add(&glob)
            .map(|_| ())
            .map_err(|e| CodewatchError::Configuration(format!("invalid glob '{glob}': {e}")))
    };

    for pattern in &config.include_patterns {
        let pattern = pattern.trim();
        if !pattern.is_empty() {
            add(pattern.to_string())?;
        }
    }
    for dir in IMPLICIT_IGNORED_DIRS {
        add(format!("!{dir}/"))?;
    }
    if config.exclude_sensitive {
        for pattern in DEFAULT_SENSITIVE_EXCLUDE_PATTERNS {
            add(format!("!{pattern}"))?;
        }
    }
    for pattern in &config.exclude_patterns {
        let pattern = pattern.trim();
        if !pattern.is_empty() {
            add(format!("!{pattern}"))?;
        }
    }

    overrides
        .build()
        .map_err(|e| CodewatchError::Configuration(format!("invalid glob set: {e}")))
}

/// Walk `root` and collect the files whose extension is in `extensions`.
///
/// Honours `.gitignore` and [`IGNORE_FILE_NAME`], skips hidden entries and the
/// implicit/sensitive exclusions. Walk errors on individual entries are logged
/// and skipped.
pub fn discover_source_files(
    root: &Path,
    config: &ExtractorConfig,
    extensions: &[String],
) -> CodewatchResult<Discovery> {
    let overrides = build_overrides(root, config)?;

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .require_git(false)
        .add_custom_ignore_filename(IGNORE_FILE_NAME)
        .follow_links(false)
        .overrides(overrides);

    let mut discovery = Discovery::default();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        discovery.files_seen += 1;

        let path = entry.path();
        let matches_extension = file_extension(path)
            .map(|ext| extensions.iter().any(|e| *e == ext))
            .unwrap_or(false);
        if !matches_extension {
            continue;
        }

        // A failed stat is left for the reader to report as a skip.
        let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
        discovery.files.push(SourceFile {
            absolute_path: path.to_path_buf(),
            relative_path: relative_to(root, path),
            size_bytes,
        });
    }

    discovery
        .files
        .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    debug!(
        root = %root.display(),
        files_seen = discovery.files_seen,
        source_files = discovery.files.len(),
        "discovered source files"
    );
    Ok(discovery)
}
