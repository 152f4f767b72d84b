//! Directed, typed edges between detected patterns.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{CodewatchError, CodewatchResult};
use crate::models::enums::RelationType;
use crate::models::pattern::Pattern;

/// Free-form, JSON-compatible explanation attached to a relation.
pub type RelationMetadata = BTreeMap<String, Value>;

/// A directed edge `source -> target`.
///
/// Endpoints are shared references to existing patterns; the relation does
/// not own them. Equality and hashing are structural over all fields,
/// metadata included.
#[derive(Clone, Debug)]
pub struct PatternRelation {
    source: Arc<Pattern>,
    target: Arc<Pattern>,
    relation_type: RelationType,
    metadata: RelationMetadata,
}

impl PatternRelation {
    /// Fails when `source` and `target` are the same pattern instance.
    /// Two distinct instances that merely compare equal may be related.
    pub fn new(
        source: Arc<Pattern>,
        target: Arc<Pattern>,
        relation_type: RelationType,
        metadata: RelationMetadata,
    ) -> CodewatchResult<Self> {
        if Arc::ptr_eq(&source, &target) {
            return Err(CodewatchError::invalid_field(
                "target",
                "Pattern relation source and target cannot be the same pattern",
            ));
        }
        Ok(Self {
            source,
            target,
            relation_type,
            metadata,
        })
    }

    pub fn source(&self) -> &Arc<Pattern> {
        &self.source
    }

    pub fn target(&self) -> &Arc<Pattern> {
        &self.target
    }

    pub fn relation_type(&self) -> RelationType {
        self.relation_type
    }

    pub fn metadata(&self) -> &RelationMetadata {
        &self.metadata
    }
}

impl PartialEq for PatternRelation {
    fn eq(&self, other: &Self) -> bool {
        self.relation_type == other.relation_type
            && self.source == other.source
            && self.target == other.target
            && self.metadata == other.metadata
    }
}

impl Eq for PatternRelation {}

impl Hash for PatternRelation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
        self.relation_type.hash(state);
        self.metadata.len().hash(state);
        for (key, value) in &self.metadata {
            key.hash(state);
            hash_value(value, state);
        }
    }
}

/// Hash a JSON value consistently with `Value`'s `PartialEq`: `-0.0` and
/// `0.0` compare equal, so they must hash equal.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Bool(b) => b.hash(state),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                0u8.hash(state);
                u.hash(state);
            } else if let Some(i) = n.as_i64() {
                1u8.hash(state);
                i.hash(state);
            } else if let Some(f) = n.as_f64() {
                2u8.hash(state);
                let f = if f == 0.0 { 0.0 } else { f };
                f.to_bits().hash(state);
            }
        }
        Value::String(s) => s.hash(state),
        Value::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        // serde_json's default map is key-sorted, so iteration order is
        // canonical.
        Value::Object(map) => {
            map.len().hash(state);
            for (key, item) in map {
                key.hash(state);
                hash_value(item, state);
            }
        }
    }
}
