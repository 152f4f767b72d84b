//! Shared typed models: enumerations, self-validating value objects, and the
//! pattern entities built from them.

pub mod confidence;
pub mod enums;
pub mod location;
pub mod pattern;
pub mod qualified_name;
pub mod relation;

pub use confidence::{ConfidenceScore, CONFIDENCE_EPSILON};
pub use enums::{Framework, HandlerType, PatternType, RelationType};
pub use location::PatternLocation;
pub use pattern::{compare_by_location, sort_patterns, HandlerPattern, KeeperPattern, Pattern};
pub use qualified_name::QualifiedName;
pub use relation::{PatternRelation, RelationMetadata};
