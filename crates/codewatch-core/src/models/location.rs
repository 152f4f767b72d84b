//! Source spans attached to detected patterns.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CodewatchError, CodewatchResult};

/// A span in a source file.
///
/// Lines are 1-indexed, columns 0-indexed. On a single line the column range
/// must not be inverted; across lines columns are unconstrained.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct PatternLocation {
    file_path: PathBuf,
    line_start: i64,
    line_end: i64,
    column_start: i64,
    column_end: i64,
}

#[derive(Deserialize)]
struct RawLocation {
    file_path: PathBuf,
    line_start: i64,
    line_end: i64,
    column_start: i64,
    column_end: i64,
}

impl TryFrom<RawLocation> for PatternLocation {
    type Error = CodewatchError;

    fn try_from(raw: RawLocation) -> CodewatchResult<Self> {
        PatternLocation::new(
            raw.file_path,
            raw.line_start,
            raw.line_end,
            raw.column_start,
            raw.column_end,
        )
    }
}

impl PatternLocation {
    /// Build a location, checking invariants in a fixed order and failing on
    /// the first violation.
    pub fn new(
        file_path: impl Into<PathBuf>,
        line_start: i64,
        line_end: i64,
        column_start: i64,
        column_end: i64,
    ) -> CodewatchResult<Self> {
        let file_path = file_path.into();

        if line_start < 1 {
            return Err(CodewatchError::location(
                "line_start",
                format!("Line start must be positive, got {line_start}"),
            ));
        }
        if line_end < 1 {
            return Err(CodewatchError::location(
                "line_end",
                format!("Line end must be positive, got {line_end}"),
            ));
        }
        if line_end < line_start {
            return Err(CodewatchError::location(
                "line_end",
                format!("Line end ({line_end}) must be >= line start ({line_start})"),
            ));
        }
        if column_start < 0 {
            return Err(CodewatchError::location(
                "column_start",
                format!("Column start must be non-negative, got {column_start}"),
            ));
        }
        if column_end < 0 {
            return Err(CodewatchError::location(
                "column_end",
                format!("Column end must be non-negative, got {column_end}"),
            ));
        }
        if line_start == line_end && column_end < column_start {
            return Err(CodewatchError::location(
                "column_end",
                format!(
                    "Column end ({column_end}) must be >= column start ({column_start}) on single line"
                ),
            ));
        }
        if !has_path_component(&file_path) {
            return Err(CodewatchError::location(
                "file_path",
                "File path cannot be empty",
            ));
        }

        Ok(Self {
            file_path,
            line_start,
            line_end,
            column_start,
            column_end,
        })
    }

    /// A location covering a whole line (column range `0-0`).
    pub fn at_line(file_path: impl Into<PathBuf>, line: i64) -> CodewatchResult<Self> {
        Self::new(file_path, line, line, 0, 0)
    }

    /// A zero-width location at `line:column`.
    pub fn single_point(
        file_path: impl Into<PathBuf>,
        line: i64,
        column: i64,
    ) -> CodewatchResult<Self> {
        Self::new(file_path, line, line, column, column)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn line_start(&self) -> i64 {
        self.line_start
    }

    pub fn line_end(&self) -> i64 {
        self.line_end
    }

    pub fn column_start(&self) -> i64 {
        self.column_start
    }

    pub fn column_end(&self) -> i64 {
        self.column_end
    }

    pub fn is_single_line(&self) -> bool {
        self.line_start == self.line_end
    }
}

/// `.` alone carries no component, matching how relative paths are normalized.
fn has_path_component(path: &Path) -> bool {
    path.components().any(|c| !matches!(c, Component::CurDir))
}

impl fmt::Display for PatternLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_line() {
            write!(
                f,
                "{}:{}:{}-{}",
                self.file_path.display(),
                self.line_start,
                self.column_start,
                self.column_end
            )
        } else {
            write!(
                f,
                "{}:{}:{}-{}:{}",
                self.file_path.display(),
                self.line_start,
                self.column_start,
                self.line_end,
                self.column_end
            )
        }
    }
}
