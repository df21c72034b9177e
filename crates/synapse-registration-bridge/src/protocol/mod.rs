//! Wire shapes of the Synapse shared-secret registration API.
//!
//! Synapse has exposed shared-secret registration in three forms over time.
//! [`Protocol`] captures which one the bridge speaks, and everything that
//! differs between them (paths, MAC field layout, payload shape and the
//! error status boundary) is decided here.

mod mac;
mod payload;

pub use mac::compute_mac;
pub use payload::{AdminFlag, RegisterPayload};

use crate::registration::RegistrationRequest;
use std::fmt;
use std::str::FromStr;

/// Nonce-based admin registration endpoint.
pub const ADMIN_REGISTER_PATH: &str = "/_matrix/client/r0/admin/register";

/// Legacy v1 registration endpoint.
pub const LEGACY_REGISTER_PATH: &str = "/_matrix/client/api/v1/register";

/// Login type sent with legacy registrations.
pub const SHARED_SECRET_LOGIN_TYPE: &str = "org.matrix.login.shared_secret";

/// Registration API version targeted by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// Current admin API: fetch a nonce, then sign it together with the credentials.
    #[default]
    Nonce,
    /// Legacy v1 API with a boolean `admin` field.
    Legacy,
    /// Legacy v1 API with `admin` sent as the string `"true"` or `"false"`.
    LegacyStringAdmin,
}

impl Protocol {
    /// Path of the registration endpoint, relative to the server base URL.
    pub fn register_path(self) -> &'static str {
        match self {
            Protocol::Nonce => ADMIN_REGISTER_PATH,
            Protocol::Legacy | Protocol::LegacyStringAdmin => LEGACY_REGISTER_PATH,
        }
    }

    /// Whether a nonce must be fetched before submitting.
    pub fn requires_nonce(self) -> bool {
        matches!(self, Protocol::Nonce)
    }

    /// Whether `status` from the registration endpoint counts as a rejection.
    ///
    /// The legacy shapes only count statuses above 400 as errors.
    pub fn is_error_status(self, status: u16) -> bool {
        match self {
            Protocol::Nonce => status >= 400,
            Protocol::Legacy | Protocol::LegacyStringAdmin => status > 400,
        }
    }

    /// Hex MAC over the fields this protocol signs.
    ///
    /// `nonce` is ignored by the legacy protocols.
    pub fn mac(self, secret: &[u8], nonce: Option<&str>, request: &RegistrationRequest) -> String {
        let username = request.username().as_bytes();
        let password = request.password().as_bytes();

        match self {
            Protocol::Nonce => {
                let admin: &[u8] = if request.request_admin() {
                    b"admin"
                } else {
                    b"notadmin"
                };
                compute_mac(
                    secret,
                    &[nonce.unwrap_or_default().as_bytes(), username, password, admin],
                )
            }
            Protocol::Legacy | Protocol::LegacyStringAdmin => {
                // No "notadmin" token here: the trailing field is empty for non-admins.
                let admin: &[u8] = if request.request_admin() { b"admin" } else { b"" };
                compute_mac(secret, &[username, password, admin])
            }
        }
    }

    /// Build the signed request body for this protocol.
    pub fn sign<'a>(
        self,
        secret: &[u8],
        nonce: Option<&'a str>,
        request: &'a RegistrationRequest,
    ) -> RegisterPayload<'a> {
        let mac = self.mac(secret, nonce, request);

        match self {
            Protocol::Nonce => RegisterPayload::Admin {
                nonce: nonce.unwrap_or_default(),
                username: request.username(),
                password: request.password(),
                mac,
                admin: request.request_admin(),
            },
            Protocol::Legacy | Protocol::LegacyStringAdmin => RegisterPayload::Legacy {
                user: request.username(),
                password: request.password(),
                mac,
                login_type: SHARED_SECRET_LOGIN_TYPE,
                admin: AdminFlag::for_protocol(self, request.request_admin()),
            },
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nonce" | "admin" => Ok(Protocol::Nonce),
            "legacy" => Ok(Protocol::Legacy),
            "legacy-string-admin" => Ok(Protocol::LegacyStringAdmin),
            other => Err(format!(
                "unknown registration protocol '{}' (expected nonce, legacy or legacy-string-admin)",
                other
            )),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::Nonce => "nonce",
            Protocol::Legacy => "legacy",
            Protocol::LegacyStringAdmin => "legacy-string-admin",
        };
        f.write_str(name)
    }
}
