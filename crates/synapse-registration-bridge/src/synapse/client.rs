//! Synapse admin API client for shared-secret registration.

use crate::error::{NonceError, RegistrationError, UpstreamReason};
use crate::protocol::{Protocol, ADMIN_REGISTER_PATH};
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Default timeout applied to both outbound calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Synapse client focused on the registration handshake.
#[derive(Clone)]
pub struct SynapseClient {
    client: Client,
    base_url: String,
}

/// Body of the nonce response.
#[derive(Debug, Deserialize)]
struct NonceResponse {
    nonce: String,
}

impl SynapseClient {
    /// Create a new client. Trailing slashes on `base_url` are stripped.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch a fresh single-use nonce from the admin registration endpoint.
    #[instrument(skip(self))]
    pub async fn fetch_nonce(&self) -> Result<String, NonceError> {
        let url = self.url(ADMIN_REGISTER_PATH);

        debug!(url = %url, "Requesting registration nonce");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "Nonce request failed");
            NonceError::Unreachable(e)
        })?;

        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, "Failed to read nonce response body");
            NonceError::ReadBody(e)
        })?;

        let parsed: NonceResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(
                error = %e,
                body = %String::from_utf8_lossy(&body),
                "Failed to decode nonce response"
            );
            NonceError::Decode(e)
        })?;

        Ok(parsed.nonce)
    }

    /// Post a signed registration body and classify the response.
    ///
    /// The raw error body is logged for the operator; callers only get the
    /// status and an [`UpstreamReason`].
    #[instrument(skip(self, body))]
    pub async fn submit(&self, protocol: Protocol, body: Vec<u8>) -> Result<(), RegistrationError> {
        let url = self.url(protocol.register_path());

        debug!(url = %url, "Sending registration request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Registration request failed");
                RegistrationError::Transport(e)
            })?;

        let status = response.status();
        if !protocol.is_error_status(status.as_u16()) {
            debug!(status = %status, "Registration accepted");
            return Ok(());
        }

        let reason = match response.text().await {
            Ok(body) => {
                warn!(status = %status, body = %body, "Synapse registration failed");
                UpstreamReason::from_body(&body)
            }
            Err(e) => {
                warn!(status = %status, error = %e, "Failed to read registration error body");
                UpstreamReason::Failed
            }
        };

        Err(RegistrationError::Upstream {
            status: status.as_u16(),
            reason,
        })
    }
}
