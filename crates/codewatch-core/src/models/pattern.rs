//! Detected pattern entities.
//!
//! [`Pattern`] is a closed sum over the concrete pattern variants. Every
//! variant carries the four shared fields (location, confidence, pattern type,
//! framework) plus its own data, and supplies its own `validate` rules.
//! Validation is explicit: detectors call [`Pattern::validate`] before handing
//! a pattern on.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::errors::{CodewatchError, CodewatchResult};
use crate::models::confidence::ConfidenceScore;
use crate::models::enums::{Framework, HandlerType, PatternType};
use crate::models::location::PatternLocation;
use crate::models::qualified_name::QualifiedName;

// ---------------------------------------------------------------------------
// KeeperPattern
// ---------------------------------------------------------------------------

/// A Cosmos SDK keeper: the state-and-logic manager of a module, identified
/// by the store keys it opens.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeeperPattern {
    location: PatternLocation,
    confidence: ConfidenceScore,
    pattern_type: PatternType,
    framework: Framework,
    keeper_name: QualifiedName,
    store_keys: Vec<String>,
    dependencies: Vec<QualifiedName>,
}

impl KeeperPattern {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        location: PatternLocation,
        confidence: ConfidenceScore,
        pattern_type: PatternType,
        framework: Framework,
        keeper_name: QualifiedName,
        store_keys: Vec<String>,
        dependencies: Vec<QualifiedName>,
    ) -> Self {
        Self {
            location,
            confidence,
            pattern_type,
            framework,
            keeper_name,
            store_keys,
            dependencies,
        }
    }

    /// A keeper must open at least one store key.
    pub fn validate(&self) -> CodewatchResult<()> {
        if self.store_keys.is_empty() {
            return Err(CodewatchError::invalid_field(
                "store_keys",
                format!("Keeper '{}' must have at least one store key", self.keeper_name),
            ));
        }
        Ok(())
    }

    pub fn location(&self) -> &PatternLocation {
        &self.location
    }

    pub fn confidence(&self) -> ConfidenceScore {
        self.confidence
    }

    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    pub fn framework(&self) -> Framework {
        self.framework
    }

    pub fn keeper_name(&self) -> &QualifiedName {
        &self.keeper_name
    }

    /// Store keys in source encounter order.
    pub fn store_keys(&self) -> &[String] {
        &self.store_keys
    }

    /// Other keepers this keeper is constructed with.
    pub fn dependencies(&self) -> &[QualifiedName] {
        &self.dependencies
    }
}

// ---------------------------------------------------------------------------
// HandlerPattern
// ---------------------------------------------------------------------------

/// A message or query handler bound to the payload type it processes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerPattern {
    location: PatternLocation,
    confidence: ConfidenceScore,
    pattern_type: PatternType,
    framework: Framework,
    handler_name: QualifiedName,
    handler_type: HandlerType,
    message_type: QualifiedName,
    keeper_dependencies: Vec<QualifiedName>,
}

impl HandlerPattern {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        location: PatternLocation,
        confidence: ConfidenceScore,
        pattern_type: PatternType,
        framework: Framework,
        handler_name: QualifiedName,
        handler_type: HandlerType,
        message_type: QualifiedName,
        keeper_dependencies: Vec<QualifiedName>,
    ) -> Self {
        Self {
            location,
            confidence,
            pattern_type,
            framework,
            handler_name,
            handler_type,
            message_type,
            keeper_dependencies,
        }
    }

    /// Handler fields are fully constrained by their types.
    pub fn validate(&self) -> CodewatchResult<()> {
        Ok(())
    }

    pub fn location(&self) -> &PatternLocation {
        &self.location
    }

    pub fn confidence(&self) -> ConfidenceScore {
        self.confidence
    }

    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    pub fn framework(&self) -> Framework {
        self.framework
    }

    pub fn handler_name(&self) -> &QualifiedName {
        &self.handler_name
    }

    pub fn handler_type(&self) -> HandlerType {
        self.handler_type
    }

    /// The message or query payload type handled.
    pub fn message_type(&self) -> &QualifiedName {
        &self.message_type
    }

    pub fn keeper_dependencies(&self) -> &[QualifiedName] {
        &self.keeper_dependencies
    }
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// Any detected pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Pattern {
    Keeper(KeeperPattern),
    Handler(HandlerPattern),
}

impl Pattern {
    pub fn validate(&self) -> CodewatchResult<()> {
        match self {
            Pattern::Keeper(p) => p.validate(),
            Pattern::Handler(p) => p.validate(),
        }
    }

    pub fn location(&self) -> &PatternLocation {
        match self {
            Pattern::Keeper(p) => p.location(),
            Pattern::Handler(p) => p.location(),
        }
    }

    pub fn confidence(&self) -> ConfidenceScore {
        match self {
            Pattern::Keeper(p) => p.confidence(),
            Pattern::Handler(p) => p.confidence(),
        }
    }

    pub fn pattern_type(&self) -> PatternType {
        match self {
            Pattern::Keeper(p) => p.pattern_type(),
            Pattern::Handler(p) => p.pattern_type(),
        }
    }

    pub fn framework(&self) -> Framework {
        match self {
            Pattern::Keeper(p) => p.framework(),
            Pattern::Handler(p) => p.framework(),
        }
    }

    /// The qualified name of the symbol the pattern was detected on.
    pub fn symbol(&self) -> &QualifiedName {
        match self {
            Pattern::Keeper(p) => p.keeper_name(),
            Pattern::Handler(p) => p.handler_name(),
        }
    }

    pub fn as_keeper(&self) -> Option<&KeeperPattern> {
        match self {
            Pattern::Keeper(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&HandlerPattern> {
        match self {
            Pattern::Handler(p) => Some(p),
            _ => None,
        }
    }
}

impl From<KeeperPattern> for Pattern {
    fn from(pattern: KeeperPattern) -> Self {
        Pattern::Keeper(pattern)
    }
}

impl From<HandlerPattern> for Pattern {
    fn from(pattern: HandlerPattern) -> Self {
        Pattern::Handler(pattern)
    }
}

/// Order by file path, then starting line, then starting column.
pub fn compare_by_location(a: &Pattern, b: &Pattern) -> Ordering {
    let (la, lb) = (a.location(), b.location());
    la.file_path()
        .cmp(lb.file_path())
        .then(la.line_start().cmp(&lb.line_start()))
        .then(la.column_start().cmp(&lb.column_start()))
}

/// Sort patterns into the order detectors and extractors must return them in.
pub fn sort_patterns(patterns: &mut [Pattern]) {
    patterns.sort_by(compare_by_location);
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::errors::ErrorKind;

    fn qn(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    fn keeper(path: &str, line: i64, store_keys: &[&str]) -> KeeperPattern {
        KeeperPattern::new(
            PatternLocation::at_line(path, line).unwrap(),
            ConfidenceScore::new(0.95).unwrap(),
            PatternType::Keeper,
            Framework::CosmosSdk,
            qn("cosmos.bank.keeper.Keeper"),
            store_keys.iter().map(|s| s.to_string()).collect(),
            vec![],
        )
    }

    fn handler(path: &str, line: i64) -> HandlerPattern {
        HandlerPattern::new(
            PatternLocation::at_line(path, line).unwrap(),
            ConfidenceScore::new(0.85).unwrap(),
            PatternType::MessageHandler,
            Framework::CosmosSdk,
            qn("cosmos.bank.handler.SendHandler"),
            HandlerType::Message,
            qn("cosmos.bank.types.MsgSend"),
            vec![qn("cosmos.bank.keeper.Keeper")],
        )
    }

    #[test]
    fn keeper_with_store_keys_validates() {
        let k = keeper("keeper.go", 142, &["bank", "supply"]);
        assert!(k.validate().is_ok());
        assert_eq!(k.location().to_string(), "keeper.go:142:0-0");
        assert_eq!(k.store_keys(), &["bank".to_string(), "supply".to_string()]);
        assert!(k.dependencies().is_empty());
    }

    #[test]
    fn keeper_without_store_keys_fails() {
        let err = keeper("keeper.go", 10, &[]).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert_eq!(err.field(), Some("store_keys"));
        assert!(err.message().contains("store key"));
        assert!(err.message().contains("cosmos.bank.keeper.Keeper"));
    }

    #[test]
    fn handler_validate_is_a_no_op() {
        let h = handler("handler.go", 25);
        assert!(h.validate().is_ok());
        assert_eq!(h.handler_type(), HandlerType::Message);
        assert_eq!(h.message_type().name(), "MsgSend");
        assert_eq!(h.keeper_dependencies().len(), 1);
    }

    #[test]
    fn pattern_dispatches_to_variant() {
        let k: Pattern = keeper("keeper.go", 1, &[]).into();
        let h: Pattern = handler("handler.go", 2).into();
        assert!(k.validate().is_err());
        assert!(h.validate().is_ok());
        assert_eq!(k.pattern_type(), PatternType::Keeper);
        assert_eq!(h.pattern_type(), PatternType::MessageHandler);
        assert_eq!(k.framework(), Framework::CosmosSdk);
        assert_eq!(h.symbol().to_string(), "cosmos.bank.handler.SendHandler");
        assert!(k.as_keeper().is_some());
        assert!(k.as_handler().is_none());
        assert_eq!(h.confidence().to_string(), "85.00%");
    }

    #[test]
    fn structural_equality_deduplicates() {
        let a: Pattern = keeper("keeper.go", 1, &["bank"]).into();
        let b: Pattern = keeper("keeper.go", 1, &["bank"]).into();
        let c: Pattern = keeper("keeper.go", 1, &["bank", "supply"]).into();
        assert_eq!(a, b);
        assert_ne!(a, c);
        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn sort_orders_by_path_line_then_column() {
        let mut patterns: Vec<Pattern> = vec![
            keeper("b.go", 1, &["x"]).into(),
            handler("a.go", 30).into(),
            keeper("a.go", 4, &["x"]).into(),
            HandlerPattern::new(
                PatternLocation::single_point("a.go", 4, 0).unwrap(),
                ConfidenceScore::LOW,
                PatternType::QueryHandler,
                Framework::CosmosSdk,
                qn("cosmos.bank.query.Balance"),
                HandlerType::Query,
                qn("cosmos.bank.types.QueryBalanceRequest"),
                vec![],
            )
            .into(),
        ];
        sort_patterns(&mut patterns);
        let rendered: Vec<String> = patterns.iter().map(|p| p.location().to_string()).collect();
        assert_eq!(rendered, ["a.go:4:0-0", "a.go:4:0-0", "a.go:30:0-0", "b.go:1:0-0"]);
        // Stable sort keeps the keeper ahead of the equal-position handler.
        assert_eq!(patterns[0].pattern_type(), PatternType::Keeper);
    }

    #[test]
    fn serde_tags_variants() {
        let p: Pattern = keeper("keeper.go", 7, &["bank"]).into();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["kind"], "keeper");
        assert_eq!(json["framework"], "cosmos_sdk");
        assert_eq!(json["keeper_name"], "cosmos.bank.keeper.Keeper");
        let back: Pattern = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
