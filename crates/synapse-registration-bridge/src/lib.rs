//! Synapse Registration Bridge - self-service sign-up for a Matrix homeserver.
//!
//! Serves a registration form and turns each submission into a call to
//! Synapse's shared-secret registration API:
//! - fetches a single-use nonce (admin API only)
//! - signs the credentials with HMAC-SHA1 keyed by the shared secret
//! - submits the registration and classifies the response into a user notice

pub mod api;
pub mod config;
pub mod error;
pub mod protocol;
pub mod registration;
pub mod synapse;

pub use config::Config;
pub use error::{NonceError, RegistrationError, UpstreamReason, ValidationError};
pub use protocol::Protocol;
pub use registration::{RegistrationBridge, RegistrationRequest};
pub use synapse::SynapseClient;
