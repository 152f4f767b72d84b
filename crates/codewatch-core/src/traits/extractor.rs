//! `Extractor` trait: pulls every pattern out of a codebase for one framework.

use std::path::Path;
use std::sync::Arc;

use crate::errors::CodewatchResult;
use crate::models::{Framework, Pattern};

/// Runs detectors across a whole codebase for a single framework.
///
/// A missing or inaccessible `codebase_path` is a `Configuration` error;
/// per-file or per-detector failures surface as an aggregated `Extraction`
/// error. Results are sorted the same way as [`super::Detector::detect`].
/// Implementations may parallelise internally.
pub trait Extractor: Send + Sync {
    fn extract(&self, codebase_path: &Path) -> CodewatchResult<Vec<Pattern>>;

    /// Pure and stable across calls.
    fn supported_framework(&self) -> Framework;
}

impl<T: Extractor + ?Sized> Extractor for Arc<T> {
    fn extract(&self, codebase_path: &Path) -> CodewatchResult<Vec<Pattern>> {
        (**self).extract(codebase_path)
    }
    fn supported_framework(&self) -> Framework {
        (**self).supported_framework()
    }
}
