//! Error types for snapshot reads and enrichment passes

use thiserror::Error;

/// Result of reading a single field from a snapshot
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Result of an enrichment pass
pub type EnrichResult<T> = Result<T, EnrichError>;

/// A snapshot accessor failed to produce its value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to read '{field}' from snapshot: {message}")]
pub struct SnapshotError {
    /// The field that could not be read (e.g. "HttpMethod", "Cookies")
    pub field: String,
    /// Human-readable cause
    pub message: String,
}

impl SnapshotError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by an enricher or the enrichment pipeline
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Property '{property}' could not be produced: {source}")]
    Field {
        property: String,
        #[source]
        source: SnapshotError,
    },

    #[error("Collection '{collection}' could not be read: {source}")]
    Collection {
        collection: String,
        #[source]
        source: SnapshotError,
    },

    #[error("Enricher '{enricher}' panicked: {message}")]
    Panicked { enricher: String, message: String },

    #[error("Diagnostics initialization failed: {message}")]
    Diagnostics { message: String },
}

impl EnrichError {
    /// Create a field error for the given property name
    pub fn field(property: impl Into<String>, source: SnapshotError) -> Self {
        Self::Field {
            property: property.into(),
            source,
        }
    }

    /// Create a collection error for the given property prefix
    pub fn collection(collection: impl Into<String>, source: SnapshotError) -> Self {
        Self::Collection {
            collection: collection.into(),
            source,
        }
    }

    pub fn panicked(enricher: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Panicked {
            enricher: enricher.into(),
            message: message.into(),
        }
    }

    pub fn diagnostics(message: impl Into<String>) -> Self {
        Self::Diagnostics {
            message: message.into(),
        }
    }

    /// Check if the error came from a failing snapshot read
    pub fn is_snapshot_failure(&self) -> bool {
        matches!(self, Self::Field { .. } | Self::Collection { .. })
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_snapshot_error_display() {
        let error = SnapshotError::new("HttpMethod", "request already disposed");
        assert_eq!(
            error.to_string(),
            "failed to read 'HttpMethod' from snapshot: request already disposed"
        );
    }

    #[test]
    fn test_field_error_keeps_source() {
        let error = EnrichError::field(
            "Request.HttpMethod",
            SnapshotError::new("HttpMethod", "gone"),
        );

        assert!(error.is_snapshot_failure());
        assert!(!error.is_panic());
        assert!(error.to_string().contains("Request.HttpMethod"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_panic_error() {
        let error = EnrichError::panicked("RequestEnricher", "boom");
        assert!(error.is_panic());
        assert!(!error.is_snapshot_failure());
        assert_eq!(error.to_string(), "Enricher 'RequestEnricher' panicked: boom");
    }
}
