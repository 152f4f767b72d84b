//! Package-qualified symbol identities such as
//! `github.com/cosmos/cosmos-sdk/x/bank/keeper.Keeper`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CodewatchError, CodewatchResult};

/// A symbol name plus the package path that encloses it.
///
/// Both parts are trimmed on construction and must be non-empty afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    package: String,
    name: String,
}

impl QualifiedName {
    pub fn new(package: impl AsRef<str>, name: impl AsRef<str>) -> CodewatchResult<Self> {
        let package = package.as_ref().trim();
        let name = name.as_ref().trim();

        if package.is_empty() {
            return Err(CodewatchError::qualified_name(
                "package",
                "Package cannot be empty",
            ));
        }
        if name.is_empty() {
            return Err(CodewatchError::qualified_name("name", "Name cannot be empty"));
        }

        Ok(Self {
            package: package.to_string(),
            name: name.to_string(),
        })
    }

    /// Split `input` at its last `.`: everything before is the package,
    /// everything after is the name.
    pub fn parse(input: &str) -> CodewatchResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CodewatchError::qualified_name(
                "qualified_name",
                "Qualified name cannot be empty",
            ));
        }

        let Some(split) = trimmed.rfind('.') else {
            return Err(CodewatchError::qualified_name(
                "qualified_name",
                format!("Qualified name must contain at least one '.' separator, got '{trimmed}'"),
            ));
        };

        Self::new(&trimmed[..split], &trimmed[split + 1..])
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

impl FromStr for QualifiedName {
    type Err = CodewatchError;

    fn from_str(s: &str) -> CodewatchResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = CodewatchError;

    fn try_from(value: String) -> CodewatchResult<Self> {
        Self::parse(&value)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> String {
        name.to_string()
    }
}
