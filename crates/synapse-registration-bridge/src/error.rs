//! Error types for the registration bridge.

use axum::http::StatusCode;
use std::fmt;
use thiserror::Error;

/// Why a registration attempt did not succeed.
///
/// `Display` carries operator-facing detail and is only ever logged. What the
/// end user sees comes from [`RegistrationError::notice`].
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Invalid registration request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to obtain nonce: {0}")]
    NonceFetch(#[from] NonceError),

    #[error("Failed to reach registration endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Synapse rejected registration ({status}): {reason}")]
    Upstream { status: u16, reason: UpstreamReason },

    #[error("Failed to encode registration payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Form input that never reaches Synapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing username")]
    MissingUsername,

    #[error("password too short")]
    PasswordTooShort,
}

/// Failures of the nonce request. Registration is not attempted after any of these.
#[derive(Debug, Error)]
pub enum NonceError {
    #[error("request failed: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("could not read body: {0}")]
    ReadBody(#[source] reqwest::Error),

    #[error("could not decode body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Classification of a rejected registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamReason {
    UsernameTaken,
    Failed,
}

impl UpstreamReason {
    /// Marker Synapse puts in the error body when the localpart is in use.
    pub const USERNAME_TAKEN_MARKER: &'static str = "User ID already taken";

    /// Classify an error response body.
    pub fn from_body(body: &str) -> Self {
        if body.contains(Self::USERNAME_TAKEN_MARKER) {
            UpstreamReason::UsernameTaken
        } else {
            UpstreamReason::Failed
        }
    }
}

impl fmt::Display for UpstreamReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamReason::UsernameTaken => f.write_str("username taken"),
            UpstreamReason::Failed => f.write_str("registration failed"),
        }
    }
}

impl RegistrationError {
    /// HTTP status for the page rendered back to the user.
    pub fn status(&self) -> StatusCode {
        match self {
            RegistrationError::Validation(_) => StatusCode::BAD_REQUEST,
            RegistrationError::NonceFetch(_) => StatusCode::BAD_REQUEST,
            RegistrationError::Payload(_) => StatusCode::BAD_REQUEST,
            RegistrationError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RegistrationError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    /// Short notice shown to the user. Never includes upstream detail.
    pub fn notice(&self) -> &'static str {
        match self {
            RegistrationError::Validation(ValidationError::MissingUsername) => {
                "Must enter a username"
            }
            RegistrationError::Validation(ValidationError::PasswordTooShort) => {
                "Password must be 10+ chars"
            }
            RegistrationError::NonceFetch(NonceError::Unreachable(_)) => {
                "Error getting nonce from synapse"
            }
            RegistrationError::NonceFetch(NonceError::ReadBody(_)) => {
                "Error reading nonce body from synapse"
            }
            RegistrationError::NonceFetch(NonceError::Decode(_)) => {
                "Error decoding nonce from synapse"
            }
            RegistrationError::Payload(_) => "Internal error building registration request",
            RegistrationError::Transport(_) => "Error hitting registration server",
            RegistrationError::Upstream {
                reason: UpstreamReason::UsernameTaken,
                ..
            } => "Username already in use",
            RegistrationError::Upstream {
                reason: UpstreamReason::Failed,
                ..
            } => "Registration error :(",
        }
    }
}
