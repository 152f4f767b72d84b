//! In-memory pattern store.
//!
//! Patterns live in an insertion-ordered set, so structurally equal patterns
//! are stored once. All reads clone out of the lock and return owned `Vec`s.
//!
//! # Query syntax
//!
//! `execute_query` accepts an empty string, `*` or `all` (every pattern), or
//! whitespace-separated `key:value` clauses that must all hold:
//!
//! | key | matches |
//! |---|---|
//! | `type` | pattern type, e.g. `type:keeper` |
//! | `framework` | framework, e.g. `framework:cosmos_sdk` |
//! | `file` | location path prefix, e.g. `file:x/bank/` |
//! | `name` | regex over the qualified symbol name |
//! | `min_confidence` | confidence lower bound, e.g. `min_confidence:0.8` |

use std::path::PathBuf;

use indexmap::IndexSet;
use parking_lot::RwLock;
use regex::Regex;
use tracing::{debug, info};

use crate::errors::{CodewatchError, CodewatchResult};
use crate::models::{Framework, Pattern, PatternType};
use crate::traits::PatternRepository;

enum Clause {
    Type(PatternType),
    Framework(Framework),
    FilePrefix(PathBuf),
    Name(Regex),
    MinConfidence(f64),
}

impl Clause {
    fn matches(&self, pattern: &Pattern) -> bool {
        match self {
            Clause::Type(t) => pattern.pattern_type() == *t,
            Clause::Framework(f) => pattern.framework() == *f,
            Clause::FilePrefix(prefix) => pattern.location().file_path().starts_with(prefix),
            Clause::Name(re) => re.is_match(&pattern.symbol().to_string()),
            Clause::MinConfidence(min) => pattern.confidence().value() >= *min,
        }
    }
}

fn query_error(query: &str, detail: impl std::fmt::Display) -> CodewatchError {
    CodewatchError::Storage(format!("query '{query}' failed: {detail}"))
}

fn parse_query(query: &str) -> CodewatchResult<Vec<Clause>> {
    let trimmed = query.trim();
    if trimmed.is_empty() || trimmed == "*" || trimmed.eq_ignore_ascii_case("all") {
        return Ok(Vec::new());
    }

    trimmed
        .split_whitespace()
        .map(|token| {
            let (key, value) = token
                .split_once(':')
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .ok_or_else(|| query_error(query, format!("malformed clause '{token}'")))?;
            let clause = match key {
                "type" => Clause::Type(value.parse().map_err(|e: CodewatchError| {
                    query_error(query, e.message())
                })?),
                "framework" => Clause::Framework(value.parse().map_err(|e: CodewatchError| {
                    query_error(query, e.message())
                })?),
                "file" => Clause::FilePrefix(PathBuf::from(value)),
                "name" => Clause::Name(
                    Regex::new(value).map_err(|e| query_error(query, format!("bad regex: {e}")))?,
                ),
                "min_confidence" => Clause::MinConfidence(
                    value
                        .parse::<f64>()
                        .map_err(|e| query_error(query, format!("bad number '{value}': {e}")))?,
                ),
                other => return Err(query_error(query, format!("unknown key '{other}'"))),
            };
            Ok(clause)
        })
        .collect()
}

/// Thread-safe, process-local [`PatternRepository`].
#[derive(Default)]
pub struct InMemoryPatternRepository {
    patterns: RwLock<IndexSet<Pattern>>,
}

impl InMemoryPatternRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }

    /// Every stored pattern, in first-insertion order.
    pub fn all(&self) -> Vec<Pattern> {
        self.patterns.read().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.patterns.write().clear();
    }
}

impl PatternRepository for InMemoryPatternRepository {
    fn save_patterns(&self, patterns: &[Pattern]) -> CodewatchResult<()> {
        if patterns.is_empty() {
            debug!("save_patterns called with an empty batch");
            return Ok(());
        }
        let mut store = self.patterns.write();
        let before = store.len();
        store.extend(patterns.iter().cloned());
        info!(
            received = patterns.len(),
            inserted = store.len() - before,
            total = store.len(),
            "saved patterns"
        );
        Ok(())
    }

    fn find_by_type(&self, pattern_type: PatternType) -> CodewatchResult<Vec<Pattern>> {
        Ok(self
            .patterns
            .read()
            .iter()
            .filter(|p| p.pattern_type() == pattern_type)
            .cloned()
            .collect())
    }

    fn execute_query(&self, query: &str) -> CodewatchResult<Vec<Pattern>> {
        let clauses = parse_query(query)?;
        let matched: Vec<Pattern> = self
            .patterns
            .read()
            .iter()
            .filter(|p| clauses.iter().all(|c| c.matches(p)))
            .cloned()
            .collect();
        debug!(query, matched = matched.len(), "executed query");
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::errors::ErrorKind;
    use crate::models::{
        ConfidenceScore, HandlerPattern, HandlerType, KeeperPattern, PatternLocation, QualifiedName,
    };

    fn keeper(path: &str, line: i64, name: &str, confidence: f64) -> Pattern {
        KeeperPattern::new(
            PatternLocation::at_line(path, line).unwrap(),
            ConfidenceScore::new(confidence).unwrap(),
            PatternType::Keeper,
            Framework::CosmosSdk,
            QualifiedName::parse(name).unwrap(),
            vec!["store".to_string()],
            vec![],
        )
        .into()
    }

    fn handler(path: &str, line: i64, handler_type: HandlerType) -> Pattern {
        let pattern_type = match handler_type {
            HandlerType::Message => PatternType::MessageHandler,
            HandlerType::Query => PatternType::QueryHandler,
        };
        HandlerPattern::new(
            PatternLocation::at_line(path, line).unwrap(),
            ConfidenceScore::MEDIUM,
            pattern_type,
            Framework::CosmosSdk,
            QualifiedName::parse("cosmos.bank.handler.Handler").unwrap(),
            handler_type,
            QualifiedName::parse("cosmos.bank.types.MsgSend").unwrap(),
            vec![],
        )
        .into()
    }

    fn seeded() -> InMemoryPatternRepository {
        let repo = InMemoryPatternRepository::new();
        repo.save_patterns(&[
            keeper("x/bank/keeper/keeper.go", 10, "bank.keeper.Keeper", 0.95),
            keeper("x/staking/keeper/keeper.go", 20, "staking.keeper.Keeper", 0.6),
            handler("x/bank/keeper/msg_server.go", 30, HandlerType::Message),
            handler("x/bank/keeper/grpc_query.go", 40, HandlerType::Query),
        ])
        .unwrap();
        repo
    }

    #[test]
    fn test_save_and_find_by_type() {
        let repo = seeded();
        assert_eq!(repo.len(), 4);
        assert_eq!(repo.find_by_type(PatternType::Keeper).unwrap().len(), 2);
        assert_eq!(repo.find_by_type(PatternType::MessageHandler).unwrap().len(), 1);
        assert_eq!(repo.find_by_type(PatternType::QueryHandler).unwrap().len(), 1);
        assert!(repo.find_by_type(PatternType::Validator).unwrap().is_empty());
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let repo = InMemoryPatternRepository::new();
        repo.save_patterns(&[]).unwrap();
        assert!(repo.is_empty());
        assert!(repo.find_by_type(PatternType::Keeper).unwrap().is_empty());
    }

    #[test]
    fn test_equal_patterns_stored_once() {
        let repo = InMemoryPatternRepository::new();
        let p = keeper("k.go", 1, "a.Keeper", 0.9);
        repo.save_patterns(&[p.clone(), p.clone()]).unwrap();
        repo.save_patterns(&[p]).unwrap();
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_results_are_independent_snapshots() {
        let repo = seeded();
        let mut first = repo.find_by_type(PatternType::Keeper).unwrap();
        first.clear();
        assert_eq!(repo.find_by_type(PatternType::Keeper).unwrap().len(), 2);
        repo.clear();
        assert!(repo.all().is_empty());
    }

    #[test]
    fn test_query_all_variants() {
        let repo = seeded();
        for q in ["", "  ", "*", "all", "ALL"] {
            assert_eq!(repo.execute_query(q).unwrap().len(), 4, "{q:?}");
        }
    }

    #[test]
    fn test_query_clauses_are_anded() {
        let repo = seeded();
        assert_eq!(repo.execute_query("type:keeper").unwrap().len(), 2);
        assert_eq!(repo.execute_query("file:x/bank").unwrap().len(), 3);
        assert_eq!(
            repo.execute_query("type:keeper file:x/bank").unwrap().len(),
            1
        );
        assert_eq!(repo.execute_query("framework:cosmos_sdk").unwrap().len(), 4);
        assert!(repo.execute_query("framework:ethereum").unwrap().is_empty());
        assert_eq!(repo.execute_query("min_confidence:0.9").unwrap().len(), 1);

        let by_name = repo.execute_query("name:^staking\\.").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].symbol().to_string(), "staking.keeper.Keeper");
    }

    #[test]
    fn test_bad_queries_are_storage_errors_with_query_text() {
        let repo = seeded();
        for q in [
            "type:nope",
            "color:red",
            "type",
            "name:(",
            "min_confidence:high",
            ":keeper",
        ] {
            let err = repo.execute_query(q).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Storage, "{q}");
            assert!(err.message().contains(q), "{q}: {}", err.message());
        }
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let repo = Arc::new(InMemoryPatternRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    let batch: Vec<Pattern> = (1..=10)
                        .map(|line| keeper(&format!("m{i}/keeper.go"), line, "m.Keeper", 0.9))
                        .collect();
                    repo.save_patterns(&batch).unwrap();
                    repo.find_by_type(PatternType::Keeper).unwrap().len()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap() >= 10);
        }
        assert_eq!(repo.len(), 80);
        // The Arc blanket impl forwards.
        assert_eq!(PatternRepository::execute_query(&repo, "all").unwrap().len(), 80);
    }
}
