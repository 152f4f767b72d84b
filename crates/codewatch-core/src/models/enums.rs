//! Closed, string-backed tag sets shared by patterns and relations.
//!
//! Every tag renders (and serializes) as its lowercase snake_case value, and
//! parsing is an exact, case-sensitive match against that value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CodewatchError;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CodewatchError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(CodewatchError::Configuration(format!(
                        "Unknown {} '{}', expected one of: {}",
                        $label,
                        other,
                        [$($value),+].join(", ")
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// Supported blockchain frameworks.
    Framework, "framework" {
        CosmosSdk => "cosmos_sdk",
        Ethereum => "ethereum",
        Polkadot => "polkadot",
    }
}

string_enum! {
    /// Pattern categories.
    ///
    /// `Validator` is reserved: no pattern entity carries it yet.
    PatternType, "pattern type" {
        Keeper => "keeper",
        MessageHandler => "message_handler",
        QueryHandler => "query_handler",
        Validator => "validator",
    }
}

string_enum! {
    /// Directed relationship categories between two patterns.
    RelationType, "relation type" {
        Calls => "calls",
        DependsOn => "depends_on",
        Implements => "implements",
        InheritsFrom => "inherits_from",
    }
}

string_enum! {
    /// Whether a handler processes transactions or read-only queries.
    HandlerType, "handler type" {
        Message => "message",
        Query => "query",
    }
}

impl Framework {
    /// File extensions a framework's source code is written in.
    pub fn default_extensions(self) -> &'static [&'static str] {
        match self {
            Framework::CosmosSdk => &["go"],
            Framework::Ethereum => &["sol"],
            Framework::Polkadot => &["rs"],
        }
    }
}
