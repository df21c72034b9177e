//! Configuration for the registration bridge.

use crate::protocol::Protocol;
use anyhow::{anyhow, bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// Bridge configuration, validated once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Synapse connection and registration settings
    pub synapse: SynapseConfig,

    /// Server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct SynapseConfig {
    /// Registration shared secret configured in Synapse
    pub shared_secret: SecretString,

    /// Synapse base URL
    pub server_url: String,

    /// Registration API version to speak
    pub protocol: Protocol,

    /// Create accounts with admin rights
    pub register_admins: bool,

    /// Timeout for each outbound request
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server listen address
    pub listen_addr: IpAddr,

    /// Server port
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level
    pub level: String,
}

/// Environment as read, before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    synapse_secret: Option<SecretString>,

    synapse_server: Option<String>,

    register_admins: Option<String>,

    synapse_protocol: Option<String>,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    request_timeout: Duration,

    #[serde(default = "default_listen_addr")]
    listen_addr: String,

    #[serde(default = "default_port")]
    port: u16,

    #[serde(default = "default_log_level")]
    log_level: String,
}

// Default value functions
fn default_timeout() -> Duration {
    crate::synapse::DEFAULT_TIMEOUT
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".into()
}

/// Interpret an on/off environment value. Unset and empty mean off.
fn parse_toggle(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "0" | "false" | "no" | "off"),
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config> {
        let shared_secret = self
            .synapse_secret
            .filter(|s| !s.expose_secret().is_empty())
            .ok_or_else(|| anyhow!("must specify SYNAPSE_SECRET environment variable"))?;

        let server_url = self
            .synapse_server
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("must specify SYNAPSE_SERVER environment variable"))?;

        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            bail!("SYNAPSE_SERVER must be an http:// or https:// URL, got '{}'", server_url);
        }

        let protocol = match self.synapse_protocol.as_deref().map(str::trim) {
            None | Some("") => Protocol::default(),
            Some(value) => value
                .parse::<Protocol>()
                .map_err(|e| anyhow!(e))
                .context("Invalid SYNAPSE_PROTOCOL")?,
        };

        if self.request_timeout.is_zero() {
            bail!("REQUEST_TIMEOUT must be greater than zero");
        }

        let listen_addr: IpAddr = self
            .listen_addr
            .trim()
            .parse()
            .with_context(|| format!("LISTEN_ADDR must be an IP address, got '{}'", self.listen_addr))?;

        Ok(Config {
            synapse: SynapseConfig {
                shared_secret,
                server_url,
                protocol,
                register_admins: parse_toggle(self.register_admins.as_deref()),
                request_timeout: self.request_timeout,
            },
            server: ServerConfig {
                listen_addr,
                port: self.port,
            },
            log: LogConfig {
                level: self.log_level,
            },
        })
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_environment(config::Environment::default())
    }

    /// Load configuration from an explicit environment source.
    pub fn from_environment(environment: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(environment.separator("__").try_parsing(false))
            .build()
            .context("Failed to build configuration")?;

        let raw: RawConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        raw.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let mut source = config::Map::new();
        for (key, value) in vars {
            source.insert(key.to_string(), value.to_string());
        }
        Config::from_environment(config::Environment::default().source(Some(source)))
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("SYNAPSE_SECRET", "s3cret"),
        ("SYNAPSE_SERVER", "http://synapse:8008/"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.synapse.shared_secret.expose_secret(), "s3cret");
        assert_eq!(config.synapse.server_url, "http://synapse:8008/");
        assert_eq!(config.synapse.protocol, Protocol::Nonce);
        assert!(!config.synapse.register_admins);
        assert_eq!(config.synapse.request_timeout, Duration::from_secs(30));
        assert_eq!(config.server.listen_addr, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_missing_secret_fails() {
        let err = load(&[("SYNAPSE_SERVER", "http://synapse:8008")]).unwrap_err();
        assert!(err.to_string().contains("SYNAPSE_SECRET"));
    }

    #[test]
    fn test_empty_secret_fails() {
        let err = load(&[("SYNAPSE_SECRET", ""), ("SYNAPSE_SERVER", "http://synapse:8008")])
            .unwrap_err();
        assert!(err.to_string().contains("SYNAPSE_SECRET"));
    }

    #[test]
    fn test_missing_server_fails() {
        let err = load(&[("SYNAPSE_SECRET", "s3cret")]).unwrap_err();
        assert!(err.to_string().contains("SYNAPSE_SERVER"));
    }

    #[test]
    fn test_server_must_be_http_url() {
        let err = load(&[("SYNAPSE_SECRET", "s3cret"), ("SYNAPSE_SERVER", "synapse:8008")])
            .unwrap_err();
        assert!(err.to_string().contains("SYNAPSE_SERVER"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("REGISTER_ADMINS", "yes"),
            ("SYNAPSE_PROTOCOL", "legacy-string-admin"),
            ("REQUEST_TIMEOUT", "5s"),
            ("LISTEN_ADDR", "127.0.0.1"),
            ("PORT", "9000"),
            ("LOG_LEVEL", "debug"),
        ]);
        let config = load(&vars).unwrap();

        assert!(config.synapse.register_admins);
        assert_eq!(config.synapse.protocol, Protocol::LegacyStringAdmin);
        assert_eq!(config.synapse.request_timeout, Duration::from_secs(5));
        assert_eq!(config.server.listen_addr, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_unknown_protocol_fails() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SYNAPSE_PROTOCOL", "v3"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_invalid_listen_addr_fails() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("LISTEN_ADDR", "not-an-ip"));
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("LISTEN_ADDR"));
    }

    #[test]
    fn test_ipv6_listen_addr() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("LISTEN_ADDR", "::"));
        let config = load(&vars).unwrap();
        assert!(config.server.listen_addr.is_ipv6());
    }

    #[test]
    fn test_zero_timeout_fails() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("REQUEST_TIMEOUT", "0s"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_parse_toggle() {
        assert!(!parse_toggle(None));
        assert!(!parse_toggle(Some("")));
        assert!(!parse_toggle(Some("0")));
        assert!(!parse_toggle(Some("False")));
        assert!(!parse_toggle(Some("off")));
        assert!(parse_toggle(Some("1")));
        assert!(parse_toggle(Some("true")));
        assert!(parse_toggle(Some("anything")));
    }
}
