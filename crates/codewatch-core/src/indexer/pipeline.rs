//! Extraction pipeline orchestration with Rayon-based parallelism.
//!
//! [`SourceTreeExtractor`] owns no detection logic: it walks a codebase,
//! feeds each source file to the registered detectors, and aggregates the
//! results.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ExtractorConfig;
use crate::errors::{CodewatchError, CodewatchResult};
use crate::indexer::filesystem::{discover_source_files, SourceFile};
use crate::models::{sort_patterns, Framework, Pattern};
use crate::traits::{Detector, Extractor};

/// Why a file was skipped, or only partly processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TooLarge { size_bytes: u64, limit: u64 },
    Unreadable(String),
    NotUtf8,
    /// Results of the detectors that succeeded are still reported.
    DetectorFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooLarge { size_bytes, limit } => {
                write!(f, "file is {size_bytes} bytes, limit is {limit}")
            }
            SkipReason::Unreadable(e) => write!(f, "unreadable: {e}"),
            SkipReason::NotUtf8 => f.write_str("not valid UTF-8"),
            SkipReason::DetectorFailed(e) => write!(f, "detector failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Full result of one extraction run.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Sorted by file path, then line.
    pub patterns: Vec<Pattern>,
    pub files_seen: usize,
    pub files_scanned: usize,
    pub skipped: Vec<SkippedFile>,
    pub elapsed_ms: u128,
}

/// Per-file worker output.
enum FileOutcome {
    Detected(Vec<Pattern>),
    Skipped(SkipReason),
    /// At least one detector failed; `patterns` holds what the others found.
    Failed {
        patterns: Vec<Pattern>,
        errors: Vec<String>,
    },
}

/// Generic [`Extractor`] that runs a fixed set of detectors over every source
/// file of one framework.
pub struct SourceTreeExtractor {
    framework: Framework,
    detectors: Vec<Arc<dyn Detector>>,
    config: ExtractorConfig,
}

impl SourceTreeExtractor {
    pub fn new(framework: Framework, config: ExtractorConfig) -> CodewatchResult<Self> {
        config.validate()?;
        Ok(Self {
            framework,
            detectors: Vec::new(),
            config,
        })
    }

    pub fn with_detector(mut self, detector: impl Detector + 'static) -> Self {
        self.detectors.push(Arc::new(detector));
        self
    }

    pub fn add_detector(&mut self, detector: Arc<dyn Detector>) {
        self.detectors.push(detector);
    }

    pub fn detectors(&self) -> &[Arc<dyn Detector>] {
        &self.detectors
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract with full bookkeeping of skipped files.
    pub fn extract_with_report(&self, codebase_path: &Path) -> CodewatchResult<ExtractionReport> {
        let started = Instant::now();
        let root = check_root(codebase_path)?;
        let extensions = self.config.effective_extensions(self.framework);
        let discovery = discover_source_files(&root, &self.config, &extensions)?;

        let outcomes = self.run_detectors(&discovery.files);

        let mut report = ExtractionReport {
            files_seen: discovery.files_seen,
            ..ExtractionReport::default()
        };
        let mut failures: Vec<String> = Vec::new();

        for (file, outcome) in discovery.files.iter().zip(outcomes) {
            match outcome {
                FileOutcome::Detected(patterns) => {
                    report.files_scanned += 1;
                    report.patterns.extend(patterns);
                }
                FileOutcome::Skipped(reason) => {
                    warn!(path = %file.relative_path.display(), %reason, "skipping file");
                    report.skipped.push(SkippedFile {
                        path: file.relative_path.clone(),
                        reason,
                    });
                }
                FileOutcome::Failed { errors, .. } if self.config.strict => {
                    failures.extend(
                        errors
                            .into_iter()
                            .map(|e| format!("{}: {e}", file.relative_path.display())),
                    );
                }
                FileOutcome::Failed { patterns, errors } => {
                    report.files_scanned += 1;
                    report.patterns.extend(patterns);
                    let reason = SkipReason::DetectorFailed(errors.join("; "));
                    warn!(path = %file.relative_path.display(), %reason, "tolerating detector failure");
                    report.skipped.push(SkippedFile {
                        path: file.relative_path.clone(),
                        reason,
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(CodewatchError::extraction(format!(
                "{} detector failure(s) while extracting {}: {}",
                failures.len(),
                root.display(),
                failures.join("; ")
            )));
        }

        sort_patterns(&mut report.patterns);
        report.elapsed_ms = started.elapsed().as_millis();
        info!(
            framework = %self.framework,
            root = %root.display(),
            files_seen = report.files_seen,
            files_scanned = report.files_scanned,
            skipped = report.skipped.len(),
            patterns = report.patterns.len(),
            elapsed_ms = report.elapsed_ms as u64,
            "extraction finished"
        );
        Ok(report)
    }

    fn run_detectors(&self, files: &[SourceFile]) -> Vec<FileOutcome> {
        if files.is_empty() {
            return vec![];
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers.max(1))
            .build();

        match pool {
            Ok(pool) => pool.install(|| files.par_iter().map(|f| self.process_file(f)).collect()),
            Err(err) => {
                warn!(error = %err, "thread pool unavailable, extracting sequentially");
                files.iter().map(|f| self.process_file(f)).collect()
            }
        }
    }

    fn process_file(&self, file: &SourceFile) -> FileOutcome {
        if file.size_bytes > self.config.max_file_bytes {
            return FileOutcome::Skipped(SkipReason::TooLarge {
                size_bytes: file.size_bytes,
                limit: self.config.max_file_bytes,
            });
        }

        let bytes = match std::fs::read(&file.absolute_path) {
            Ok(b) => b,
            Err(e) => return FileOutcome::Skipped(SkipReason::Unreadable(e.to_string())),
        };
        let source = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => return FileOutcome::Skipped(SkipReason::NotUtf8),
        };

        let mut patterns = Vec::new();
        let mut errors = Vec::new();
        for detector in &self.detectors {
            match detector.detect(&source, &file.relative_path) {
                Ok(found) => patterns.extend(found),
                Err(e) => errors.push(format!(
                    "{} detector: {}",
                    detector.supported_pattern_type(),
                    e.message()
                )),
            }
        }

        debug!(
            path = %file.relative_path.display(),
            patterns = patterns.len(),
            errors = errors.len(),
            "processed file"
        );
        if errors.is_empty() {
            FileOutcome::Detected(patterns)
        } else {
            FileOutcome::Failed { patterns, errors }
        }
    }
}

fn check_root(codebase_path: &Path) -> CodewatchResult<PathBuf> {
    let metadata = std::fs::metadata(codebase_path).map_err(|e| {
        CodewatchError::Configuration(format!(
            "codebase path {} is not accessible: {e}",
            codebase_path.display()
        ))
    })?;
    if !metadata.is_dir() {
        return Err(CodewatchError::Configuration(format!(
            "codebase path {} is not a directory",
            codebase_path.display()
        )));
    }
    Ok(codebase_path.to_path_buf())
}

impl Extractor for SourceTreeExtractor {
    fn extract(&self, codebase_path: &Path) -> CodewatchResult<Vec<Pattern>> {
        Ok(self.extract_with_report(codebase_path)?.patterns)
    }

    fn supported_framework(&self) -> Framework {
        self.framework
    }
}
