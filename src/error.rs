use thiserror::Error;

/// HTTP status the backends use for a missing reference, branch or pull request.
pub const NOT_FOUND: u16 = 404;

/// Unified error type for version-branch operations
#[derive(Error, Debug)]
pub enum VersionBranchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    #[error("Invalid version-level: {0}")]
    InvalidMode(String),

    #[error("Base: {0}, not found.")]
    BaseBranchNotFound(String),

    #[error("Backend request failed{}: {message}", status_suffix(.status))]
    Backend {
        status: Option<u16>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Convenience type alias for Results in version-branch
pub type Result<T> = std::result::Result<T, VersionBranchError>;

impl VersionBranchError {
    /// Create an invalid input error with context
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        VersionBranchError::InvalidInput(msg.into())
    }

    /// Create an invalid version error for `value`
    pub fn invalid_version(value: impl Into<String>, reason: impl Into<String>) -> Self {
        VersionBranchError::InvalidVersion {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersionBranchError::Config(msg.into())
    }

    /// Create a backend error carrying the status reported by the backend, if any
    pub fn backend(status: Option<u16>, msg: impl Into<String>) -> Self {
        VersionBranchError::Backend {
            status,
            message: msg.into(),
        }
    }

    /// Create a backend error with the well-known not-found status
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::backend(Some(NOT_FOUND), msg)
    }

    /// Create a network error with context
    pub fn network(msg: impl Into<String>) -> Self {
        VersionBranchError::Network(msg.into())
    }

    /// Status code reported by the backend, if this is a backend error that carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            VersionBranchError::Backend { status, .. } => *status,
            _ => None,
        }
    }

    /// True when the backend reported the requested object does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(NOT_FOUND)
    }

    /// True for every kind of rejected caller input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            VersionBranchError::InvalidInput(_)
                | VersionBranchError::InvalidVersion { .. }
                | VersionBranchError::InvalidMode(_)
        )
    }
}
