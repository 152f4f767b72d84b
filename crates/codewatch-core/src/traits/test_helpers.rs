//! Minimal in-crate detectors used by unit tests.

use std::path::Path;

use crate::errors::{CodewatchError, CodewatchResult};
use crate::models::{
    sort_patterns, ConfidenceScore, Framework, KeeperPattern, Pattern, PatternLocation,
    PatternType, QualifiedName,
};
use crate::traits::Detector;

/// Reports every `type <Name>Keeper struct` line as a keeper whose only
/// store key is the Go package name.
pub struct KeeperLineDetector;

impl Detector for KeeperLineDetector {
    fn detect(&self, source_code: &str, file_path: &Path) -> CodewatchResult<Vec<Pattern>> {
        let package = source_code
            .lines()
            .find_map(|l| l.trim().strip_prefix("package "))
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| "main".to_string());

        let mut found = Vec::new();
        for (idx, line) in source_code.lines().enumerate() {
            let trimmed = line.trim();
            let Some(rest) = trimmed.strip_prefix("type ") else {
                continue;
            };
            if !rest.contains("Keeper struct") {
                continue;
            }
            let name = rest.split_whitespace().next().unwrap_or("Keeper");
            let keeper = KeeperPattern::new(
                PatternLocation::at_line(file_path, idx as i64 + 1)?,
                ConfidenceScore::HIGH,
                PatternType::Keeper,
                Framework::CosmosSdk,
                QualifiedName::new(&package, name)?,
                vec![package.clone()],
                vec![],
            );
            keeper.validate()?;
            found.push(Pattern::from(keeper));
        }
        sort_patterns(&mut found);
        Ok(found)
    }

    fn supported_pattern_type(&self) -> PatternType {
        PatternType::Keeper
    }
}

/// Always fails, as a detector hitting unparseable input would.
pub struct FailingDetector;

impl Detector for FailingDetector {
    fn detect(&self, _source_code: &str, _file_path: &Path) -> CodewatchResult<Vec<Pattern>> {
        Err(CodewatchError::extraction("unbalanced braces"))
    }

    fn supported_pattern_type(&self) -> PatternType {
        PatternType::MessageHandler
    }
}
