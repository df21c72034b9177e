//! JSON bodies posted to the registration endpoint.

use super::Protocol;
use serde::Serialize;

/// Signed registration body.
///
/// Serialized untagged: each variant is the exact object Synapse expects.
/// No `Debug` impl, the body carries the plaintext password.
#[derive(Serialize)]
#[serde(untagged)]
pub enum RegisterPayload<'a> {
    /// Body for the nonce-based admin API.
    Admin {
        nonce: &'a str,
        username: &'a str,
        password: &'a str,
        mac: String,
        admin: bool,
    },
    /// Body for the legacy v1 API.
    Legacy {
        user: &'a str,
        password: &'a str,
        mac: String,
        #[serde(rename = "type")]
        login_type: &'static str,
        admin: AdminFlag,
    },
}

/// How the legacy `admin` field is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AdminFlag {
    Bool(bool),
    Text(&'static str),
}

impl AdminFlag {
    pub fn for_protocol(protocol: Protocol, admin: bool) -> Self {
        match protocol {
            Protocol::LegacyStringAdmin => AdminFlag::Text(if admin { "true" } else { "false" }),
            Protocol::Nonce | Protocol::Legacy => AdminFlag::Bool(admin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admin_flag_encoding() {
        assert_eq!(
            serde_json::to_value(AdminFlag::for_protocol(Protocol::Legacy, false)).unwrap(),
            json!(false)
        );
        assert_eq!(
            serde_json::to_value(AdminFlag::for_protocol(Protocol::LegacyStringAdmin, false))
                .unwrap(),
            json!("false")
        );
    }
}
