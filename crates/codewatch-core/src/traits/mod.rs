//! Capability contracts implemented by detection, extraction and storage
//! backends.
//!
//! All traits are object-safe, `Send + Sync`, and have blanket `Arc<T>` impls
//! so a single backend instance can be shared across worker threads.

pub mod detector;
pub mod extractor;
pub mod repository;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use detector::Detector;
pub use extractor::Extractor;
pub use repository::PatternRepository;
