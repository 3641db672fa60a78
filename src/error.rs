//! Error types for TasCraft
//!
//! Library operations return [`TasCraftError`]. The MCP handlers turn these into
//! public tool errors; the calculator and the gamification arithmetic never fail
//! and do not appear here.

/// All errors that can occur while reading or changing the quest log.
#[derive(Debug, thiserror::Error)]
pub enum TasCraftError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Username not found. Create a profile first.")]
    UnknownUser,

    #[error("Username already taken!")]
    UsernameTaken,

    #[error("Not signed in. Use sign_in or sign_up first.")]
    NotSignedIn,

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TasCraftError {
    pub fn task_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "Task",
            id: id.to_string(),
        }
    }

    pub fn subject_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "Subject",
            id: id.to_string(),
        }
    }

    /// The backend could not be reached or refused the request.
    ///
    /// Missing rows and bad input are not remote failures and never switch the
    /// service to offline mode.
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Backend { .. })
    }
}


pub type Result<T> = std::result::Result<T, TasCraftError>;
