//! Error types for the Codewatch core library.
//!
//! Every fallible operation in the crate returns [`CodewatchResult`]. Callers
//! that need to branch on the failure category match on [`CodewatchError::kind`]
//! instead of the individual variants.

/// Coarse error category, used for matching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidLocation,
    InvalidConfidenceScore,
    InvalidQualifiedName,
    Extraction,
    Storage,
    Configuration,
}

impl ErrorKind {
    /// True for the value-object validation kinds.
    pub fn is_invalid_value(self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidLocation
                | ErrorKind::InvalidConfidenceScore
                | ErrorKind::InvalidQualifiedName
        )
    }
}

/// Top-level error enum for the Codewatch core library.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodewatchError {
    #[error("Invalid location ({field}): {message}")]
    InvalidLocation { field: &'static str, message: String },

    #[error("Invalid confidence score: {0}")]
    InvalidConfidenceScore(String),

    #[error("Invalid qualified name ({field}): {message}")]
    InvalidQualifiedName { field: &'static str, message: String },

    #[error("Extraction error: {message}")]
    Extraction {
        field: Option<&'static str>,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CodewatchError {
    pub(crate) fn location(field: &'static str, message: impl Into<String>) -> Self {
        CodewatchError::InvalidLocation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn qualified_name(field: &'static str, message: impl Into<String>) -> Self {
        CodewatchError::InvalidQualifiedName {
            field,
            message: message.into(),
        }
    }

    /// An extraction failure with no single offending field.
    pub fn extraction(message: impl Into<String>) -> Self {
        CodewatchError::Extraction {
            field: None,
            message: message.into(),
        }
    }

    /// An extraction failure caused by one field of a detected pattern.
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        CodewatchError::Extraction {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CodewatchError::InvalidLocation { .. } => ErrorKind::InvalidLocation,
            CodewatchError::InvalidConfidenceScore(_) => ErrorKind::InvalidConfidenceScore,
            CodewatchError::InvalidQualifiedName { .. } => ErrorKind::InvalidQualifiedName,
            CodewatchError::Extraction { .. } => ErrorKind::Extraction,
            CodewatchError::Storage(_) => ErrorKind::Storage,
            CodewatchError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Name of the offending field, when the failure is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CodewatchError::InvalidLocation { field, .. }
            | CodewatchError::InvalidQualifiedName { field, .. } => Some(*field),
            CodewatchError::InvalidConfidenceScore(_) => Some("value"),
            CodewatchError::Extraction { field, .. } => *field,
            CodewatchError::Storage(_) | CodewatchError::Configuration(_) => None,
        }
    }

    /// The bare human-readable message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            CodewatchError::InvalidLocation { message, .. }
            | CodewatchError::InvalidQualifiedName { message, .. }
            | CodewatchError::Extraction { message, .. } => message,
            CodewatchError::InvalidConfidenceScore(message)
            | CodewatchError::Storage(message)
            | CodewatchError::Configuration(message) => message,
        }
    }
}

pub type CodewatchResult<T> = Result<T, CodewatchError>;
