//! Backend errors.

/// Errors produced by [`crate::Backend`] operations.
///
/// `Api` displays the backend's own message verbatim so callers can surface
/// it to the user unchanged (e.g. "Invalid login credentials").
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// A configuration value is missing or malformed.
    #[error("backend config invalid: {0}")]
    Config(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api {
        status: u16,
        /// Machine-readable code when the backend supplies one (e.g. `PGRST116`).
        code: Option<String>,
        message: String,
    },

    /// A response body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),
}

impl BackendError {
    /// HTTP status for `Api` errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a single-row request matched zero or several rows.
    #[must_use]
    pub fn is_not_single_row(&self) -> bool {
        matches!(self, Self::Api { code: Some(code), .. } if code == "PGRST116")
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
