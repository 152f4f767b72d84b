//! `PatternRepository` trait: the persistence boundary for detected patterns.

use std::sync::Arc;

use crate::errors::CodewatchResult;
use crate::models::{Pattern, PatternType};

/// Storage backend for patterns.
///
/// Every read returns a freshly materialized `Vec` (empty, never absent, when
/// nothing matches) with no ordering guarantee. Backend, serialization,
/// permission, syntax and timeout failures are all `Storage` errors.
pub trait PatternRepository: Send + Sync {
    /// Persist a batch. An empty batch is a no-op. Atomic where the backend
    /// allows it.
    fn save_patterns(&self, patterns: &[Pattern]) -> CodewatchResult<()>;

    fn find_by_type(&self, pattern_type: PatternType) -> CodewatchResult<Vec<Pattern>>;

    /// Run a backend-specific query. Failures include the query text.
    fn execute_query(&self, query: &str) -> CodewatchResult<Vec<Pattern>>;
}

impl<T: PatternRepository + ?Sized> PatternRepository for Arc<T> {
    fn save_patterns(&self, patterns: &[Pattern]) -> CodewatchResult<()> {
        (**self).save_patterns(patterns)
    }
    fn find_by_type(&self, pattern_type: PatternType) -> CodewatchResult<Vec<Pattern>> {
        (**self).find_by_type(pattern_type)
    }
    fn execute_query(&self, query: &str) -> CodewatchResult<Vec<Pattern>> {
        (**self).execute_query(query)
    }
}
