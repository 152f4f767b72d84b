pub mod filesystem;
pub mod pipeline;

pub use pipeline::{ExtractionReport, SkipReason, SkippedFile, SourceTreeExtractor};
