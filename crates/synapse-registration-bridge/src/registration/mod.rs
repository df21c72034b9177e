//! The registration pipeline: validate, fetch nonce, sign, submit, classify.

use crate::config::SynapseConfig;
use crate::error::{RegistrationError, ValidationError};
use crate::protocol::Protocol;
use crate::synapse::SynapseClient;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::{info, instrument};

/// Passwords shorter than this are rejected before contacting Synapse.
pub const MIN_PASSWORD_LENGTH: usize = 10;

/// A validated registration request.
#[derive(Clone)]
pub struct RegistrationRequest {
    username: String,
    password: String,
    request_admin: bool,
}

impl RegistrationRequest {
    /// Validate form input into a request.
    ///
    /// Password length is counted in characters, not bytes.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        request_admin: bool,
    ) -> Result<Self, ValidationError> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }

        Ok(Self {
            username,
            password,
            request_admin,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn request_admin(&self) -> bool {
        self.request_admin
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("request_admin", &self.request_admin)
            .finish()
    }
}

/// Registers accounts on Synapse using the shared secret.
///
/// Holds no per-request state; one instance serves every request.
pub struct RegistrationBridge {
    client: SynapseClient,
    protocol: Protocol,
    shared_secret: SecretString,
    register_admins: bool,
}

impl RegistrationBridge {
    /// Create a bridge from validated configuration.
    pub fn new(config: &SynapseConfig) -> Result<Self> {
        let client = SynapseClient::new(&config.server_url, config.request_timeout)?;
        Ok(Self::with_client(
            client,
            config.protocol,
            config.shared_secret.clone(),
            config.register_admins,
        ))
    }

    /// Create a bridge around an existing client.
    pub fn with_client(
        client: SynapseClient,
        protocol: Protocol,
        shared_secret: SecretString,
        register_admins: bool,
    ) -> Self {
        Self {
            client,
            protocol,
            shared_secret,
            register_admins,
        }
    }

    /// Validate raw form input and register it.
    ///
    /// Validation failures return before any request is made.
    pub async fn register_user(&self, username: &str, password: &str) -> Result<(), RegistrationError> {
        let request = RegistrationRequest::new(username, password, self.register_admins)?;
        self.register(&request).await
    }

    /// Run the handshake for one request. Stops at the first failure; nothing is retried.
    #[instrument(skip(self, request), fields(username = %request.username(), protocol = %self.protocol))]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<(), RegistrationError> {
        let nonce = if self.protocol.requires_nonce() {
            Some(self.client.fetch_nonce().await?)
        } else {
            None
        };

        let payload = self.protocol.sign(
            self.shared_secret.expose_secret().as_bytes(),
            nonce.as_deref(),
            request,
        );
        let body = serde_json::to_vec(&payload)?;

        self.client.submit(self.protocol, body).await?;

        info!(admin = request.request_admin(), "Account registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let request = RegistrationRequest::new("alice", "password123", true).unwrap();
        assert_eq!(request.username(), "alice");
        assert_eq!(request.password(), "password123");
        assert!(request.request_admin());
    }

    #[test]
    fn test_empty_username_rejected() {
        let err = RegistrationRequest::new("", "password123", false).unwrap_err();
        assert_eq!(err, ValidationError::MissingUsername);
    }

    #[test]
    fn test_missing_username_checked_first() {
        let err = RegistrationRequest::new("", "short", false).unwrap_err();
        assert_eq!(err, ValidationError::MissingUsername);
    }

    #[test]
    fn test_password_length_boundary() {
        assert_eq!(
            RegistrationRequest::new("alice", "123456789", false).unwrap_err(),
            ValidationError::PasswordTooShort
        );
        assert!(RegistrationRequest::new("alice", "1234567890", false).is_ok());
    }

    #[test]
    fn test_password_length_counts_characters() {
        // Nine characters, eighteen bytes.
        assert_eq!(
            RegistrationRequest::new("alice", "ééééééééé", false).unwrap_err(),
            ValidationError::PasswordTooShort
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let request = RegistrationRequest::new("alice", "password123", false).unwrap();
        let debug = format!("{:?}", request);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("password123"));
    }
}
