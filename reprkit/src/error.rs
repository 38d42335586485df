//! Error types for field extraction, formatting, templating and type aggregation

use thiserror::Error;

/// Result type for reprkit operations
pub type Result<T> = std::result::Result<T, ReprError>;

/// Severity levels for error classification
///
/// - **Error**: a single render call failed; the registry and other types are
///   unaffected.
/// - **Critical**: a type could not be defined (or configuration could not be
///   loaded). Instances of that type cannot be rendered at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Operation failed but the system can continue
    Error,
    /// Load-time failure, the affected type is unusable
    Critical,
}

/// Errors that can occur while defining types or rendering instances
#[derive(Debug, Error)]
pub enum ReprError {
    /// An extractor could not produce a value from the instance
    #[error("cannot extract field '{field}' from {type_name}: {reason}")]
    Extraction {
        type_name: String,
        field: String,
        reason: String,
    },

    /// A formatter could not turn an extracted value into a string
    #[error("cannot format field '{field}': {reason}")]
    Formatting { field: String, reason: String },

    /// The top-level template is malformed or references a key that rendering
    /// does not supply
    #[error("template error in '{template}': {reason}")]
    Template { template: String, reason: String },

    /// Building the renderer for a type failed at definition time
    #[error("cannot define type '{type_name}': {reason}")]
    Aggregation { type_name: String, reason: String },

    /// Render style configuration could not be loaded
    #[error("failed to load render style: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl ReprError {
    pub fn extraction(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Extraction {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn formatting(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Formatting {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
            reason: reason.into(),
        }
    }

    pub fn aggregation(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Aggregation {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was raised while defining a type or loading
    /// configuration rather than while rendering an instance.
    pub fn is_load_time(&self) -> bool {
        matches!(self, Self::Aggregation { .. } | Self::Config(_))
    }

    pub fn severity(&self) -> ErrorSeverity {
        if self.is_load_time() {
            ErrorSeverity::Critical
        } else {
            ErrorSeverity::Error
        }
    }
}

impl From<figment::Error> for ReprError {
    fn from(error: figment::Error) -> Self {
        Self::Config(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_display() {
        let err = ReprError::extraction("Point", "missing", "no such attribute");
        assert_eq!(
            err.to_string(),
            "cannot extract field 'missing' from Point: no such attribute"
        );
    }

    #[test]
    fn test_template_display() {
        let err = ReprError::template("{nope}", "unknown key 'nope'");
        assert!(err.to_string().contains("{nope}"));
        assert!(err.to_string().contains("unknown key 'nope'"));
    }

    #[test]
    fn test_severity_split() {
        assert_eq!(
            ReprError::formatting("x", "bad").severity(),
            ErrorSeverity::Error
        );
        assert_eq!(
            ReprError::extraction("T", "x", "gone").severity(),
            ErrorSeverity::Error
        );
        let err = ReprError::aggregation("Child", "unknown parent 'Base'");
        assert!(err.is_load_time());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
