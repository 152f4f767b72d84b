//! `Detector` trait: finds one pattern type in a single source file.

use std::path::Path;
use std::sync::Arc;

use crate::errors::CodewatchResult;
use crate::models::{Pattern, PatternType};

/// Detects every instance of one pattern type in a source file.
///
/// Implementations hold no shared mutable state; `detect` may run on many
/// files concurrently.
pub trait Detector: Send + Sync {
    /// Analyse `source_code`, using `file_path` for the returned locations.
    ///
    /// Returns patterns sorted by file path then line (see
    /// [`crate::models::sort_patterns`]), or an empty `Vec` when nothing is
    /// found. Parse or analysis failures are `Extraction` errors that say
    /// what failed.
    fn detect(&self, source_code: &str, file_path: &Path) -> CodewatchResult<Vec<Pattern>>;

    /// The pattern type this detector finds. Pure and stable across calls.
    fn supported_pattern_type(&self) -> PatternType;
}

impl<T: Detector + ?Sized> Detector for Arc<T> {
    fn detect(&self, source_code: &str, file_path: &Path) -> CodewatchResult<Vec<Pattern>> {
        (**self).detect(source_code, file_path)
    }
    fn supported_pattern_type(&self) -> PatternType {
        (**self).supported_pattern_type()
    }
}

impl<T: Detector + ?Sized> Detector for Box<T> {
    fn detect(&self, source_code: &str, file_path: &Path) -> CodewatchResult<Vec<Pattern>> {
        (**self).detect(source_code, file_path)
    }
    fn supported_pattern_type(&self) -> PatternType {
        (**self).supported_pattern_type()
    }
}
