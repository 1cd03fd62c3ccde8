use thiserror::Error;

use crate::validation_support::ValidationError;

/// Failures reading or writing resources as JSON.
#[derive(Debug, Error)]
pub enum FhirError {
    /// Malformed JSON, or JSON that does not fit the model. `path` is the
    /// dotted location of the failing member, empty at the document root.
    #[error("invalid JSON at '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize resource: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("missing or non-string resourceType")]
    MissingResourceType,

    #[error("unsupported resource type '{0}'")]
    UnsupportedResourceType(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FhirError {
    /// The element path the error is attached to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            FhirError::Json { path, .. } => Some(path),
            FhirError::Validation(err) => Some(err.path()),
            _ => None,
        }
    }
}
