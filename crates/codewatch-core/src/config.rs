//! Extraction configuration.

use ignore::overrides::OverrideBuilder;
use serde::{Deserialize, Serialize};

use crate::errors::{CodewatchError, CodewatchResult};
use crate::models::Framework;

/// Environment switch for the sensitive-file exclusions.
pub const EXCLUDE_SENSITIVE_ENV: &str = "CODEWATCH_EXCLUDE_SENSITIVE";

pub const DEFAULT_MAX_FILE_BYTES: u64 = 1_048_576;

/// Configuration for [`crate::indexer::pipeline::SourceTreeExtractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Gitignore-style globs; when non-empty only matching files are read.
    pub include_patterns: Vec<String>,
    /// Gitignore-style globs excluded on top of `.gitignore`/`.codewatchignore`.
    pub exclude_patterns: Vec<String>,
    /// Source file extensions without the dot. Empty means the framework's
    /// defaults.
    pub extensions: Vec<String>,
    /// Files larger than this are skipped.
    pub max_file_bytes: u64,
    /// Size of the detection thread pool.
    pub workers: usize,
    /// Fail the extraction when any detector fails. When false, detector
    /// failures are logged and the file is recorded as skipped.
    pub strict: bool,
    /// Skip `.env`, key material and credential-looking files.
    pub exclude_sensitive: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            extensions: Vec::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            strict: true,
            exclude_sensitive: true,
        }
    }
}

impl ExtractorConfig {
    /// Defaults, with [`EXCLUDE_SENSITIVE_ENV`] applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(val) = std::env::var(EXCLUDE_SENSITIVE_ENV) {
            config.exclude_sensitive = parse_switch(&val);
        }
        config
    }

    /// Extensions to scan for `framework`, lowercased and without dots.
    pub fn effective_extensions(&self, framework: Framework) -> Vec<String> {
        if self.extensions.is_empty() {
            return framework
                .default_extensions()
                .iter()
                .map(|e| e.to_string())
                .collect();
        }
        self.extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }

    pub fn validate(&self) -> CodewatchResult<()> {
        if self.workers == 0 {
            return Err(CodewatchError::Configuration(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(CodewatchError::Configuration(
                "max_file_bytes must be positive".to_string(),
            ));
        }
        // Compile every glob against a dummy root so bad patterns fail here
        // rather than mid-walk.
        let mut builder = OverrideBuilder::new("/");
        for pattern in self.include_patterns.iter().chain(&self.exclude_patterns) {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            builder.add(pattern).map_err(|e| {
                CodewatchError::Configuration(format!("invalid glob '{pattern}': {e}"))
            })?;
        }
        Ok(())
    }
}

/// Anything but an explicit off value counts as on.
fn parse_switch(raw: &str) -> bool {
    let v = raw.trim().to_lowercase();
    !matches!(v.as_str(), "0" | "false" | "no" | "off")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn defaults_are_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.strict);
        assert!(config.exclude_sensitive);
        assert!(config.workers >= 1);
        assert_eq!(config.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    }

    #[test]
    fn zero_workers_is_a_configuration_error() {
        let config = ExtractorConfig {
            workers: 0,
            ..ExtractorConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn bad_glob_is_a_configuration_error() {
        let config = ExtractorConfig {
            exclude_patterns: vec!["x/{unclosed".to_string()],
            ..ExtractorConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.message().contains("x/{unclosed"));
    }

    #[test]
    fn extensions_fall_back_to_framework() {
        let config = ExtractorConfig::default();
        assert_eq!(config.effective_extensions(Framework::CosmosSdk), vec!["go"]);

        let config = ExtractorConfig {
            extensions: vec![".GO".to_string(), " proto ".to_string(), "".to_string()],
            ..ExtractorConfig::default()
        };
        assert_eq!(
            config.effective_extensions(Framework::CosmosSdk),
            vec!["go", "proto"]
        );
    }

    #[test]
    fn switch_parsing() {
        for off in ["0", "false", "No", " OFF "] {
            assert!(!parse_switch(off), "{off}");
        }
        for on in ["1", "true", "yes", ""] {
            assert!(parse_switch(on), "{on}");
        }
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: ExtractorConfig =
            serde_json::from_str(r#"{"workers": 2, "strict": false}"#).unwrap();
        assert_eq!(config.workers, 2);
        assert!(!config.strict);
        assert!(config.exclude_sensitive);
        assert!(config.extensions.is_empty());
    }
}
