//! Error types for Vinifera operations.
//!
//! Provides rich error context for library consumers while keeping a
//! separate, non-leaking view for external callers.

use std::fmt;

/// Main error type for Vinifera operations.
///
/// Covers the full failure taxonomy of the inference pipeline: artifact
/// storage problems, structural corruption, per-request input validation,
/// and internal contract violations.
///
/// # Examples
///
/// ```
/// use vinifera::error::ViniferaError;
///
/// let err = ViniferaError::Validation {
///     message: "Missing required features: proline".to_string(),
/// };
/// assert!(err.to_string().contains("proline"));
/// assert!(err.is_client_error());
/// ```
#[derive(Debug)]
pub enum ViniferaError {
    /// No artifact exists at the configured storage path.
    ArtifactNotFound {
        /// Configured artifact path
        path: String,
    },

    /// Artifact deserializes but is structurally invalid.
    ArtifactCorrupt {
        /// Error description
        message: String,
    },

    /// Caller input is missing features or contains non-numeric values.
    Validation {
        /// Human-readable message naming every offending feature
        message: String,
    },

    /// Failure inside scaling/classification/assembly on validated input.
    Internal {
        /// Error description (operator-facing only)
        message: String,
    },

    /// I/O error other than artifact absence.
    Io(std::io::Error),
}

impl fmt::Display for ViniferaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViniferaError::ArtifactNotFound { path } => {
                write!(f, "Model artifact not found at {path}")
            }
            ViniferaError::ArtifactCorrupt { message } => {
                write!(f, "Invalid model artifact: {message}")
            }
            ViniferaError::Validation { message } => write!(f, "{message}"),
            ViniferaError::Internal { message } => {
                write!(f, "Internal prediction error: {message}")
            }
            ViniferaError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ViniferaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViniferaError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViniferaError {
    fn from(err: std::io::Error) -> Self {
        ViniferaError::Io(err)
    }
}

impl ViniferaError {
    /// Create a validation error from a message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an internal error from a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an artifact-corrupt error from a message.
    #[must_use]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::ArtifactCorrupt {
            message: message.into(),
        }
    }

    /// True for errors the caller can fix by resubmitting corrected input.
    ///
    /// The hosting layer maps client errors to its 4xx class and everything
    /// else to 5xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, ViniferaError::Validation { .. })
    }

    /// Message safe to expose to external callers.
    ///
    /// Validation messages are returned in full; every other kind collapses
    /// to a generic string so paths and internal state never cross the
    /// service boundary. Operators get the full `Display` output.
    #[must_use]
    pub fn client_message(&self) -> &str {
        match self {
            ViniferaError::Validation { message } => message,
            _ => "An internal error occurred. Please try again.",
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ViniferaError>;
