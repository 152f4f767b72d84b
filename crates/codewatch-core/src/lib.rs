//! Codewatch core library: the domain model for structural patterns detected
//! in blockchain-framework source code.
//!
//! The crate provides self-validating value objects ([`PatternLocation`],
//! [`ConfidenceScore`], [`QualifiedName`]), immutable pattern entities and the
//! relations between them, the capability traits that detection, extraction
//! and storage backends implement, plus a generic source-tree extractor and an
//! in-memory repository.
//!
//! ```
//! use codewatch_core::models::*;
//!
//! let keeper = KeeperPattern::new(
//!     PatternLocation::at_line("keeper.go", 142)?,
//!     ConfidenceScore::new(0.95)?,
//!     PatternType::Keeper,
//!     Framework::CosmosSdk,
//!     QualifiedName::parse("github.com/cosmos/cosmos-sdk/x/bank/keeper.Keeper")?,
//!     vec!["bank".to_string(), "supply".to_string()],
//!     vec![],
//! );
//! keeper.validate()?;
//! assert_eq!(keeper.location().to_string(), "keeper.go:142:0-0");
//! # Ok::<(), codewatch_core::CodewatchError>(())
//! ```

pub mod config;
pub mod errors;
pub mod indexer;
pub mod models;
pub mod store;
pub mod traits;

pub use config::ExtractorConfig;
pub use errors::{CodewatchError, CodewatchResult, ErrorKind};
pub use indexer::SourceTreeExtractor;
pub use models::{
    ConfidenceScore, Framework, HandlerPattern, HandlerType, KeeperPattern, Pattern,
    PatternLocation, PatternRelation, PatternType, QualifiedName, RelationMetadata, RelationType,
};
pub use store::InMemoryPatternRepository;
pub use traits::{Detector, Extractor, PatternRepository};
