//! Connection settings for the marketplace canister

use serde::{Deserialize, Serialize};

use crate::error::ConnectError;

/// Local replica address used by `dfx start`
pub const DEFAULT_HOST: &str = "http://127.0.0.1:4943";

/// Canister id of the marketplace backend on the local replica
pub const DEFAULT_CANISTER_ID: &str = "uxrrr-q7777-77774-qaaaq-cai";

/// Where and how to reach the marketplace canister
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Replica base URL
    #[serde(default = "default_host")]
    pub host: String,

    /// Target canister id (textual principal)
    #[serde(default = "default_canister_id")]
    pub canister_id: String,

    /// Fetch the replica root key when the session opens. Needed against a
    /// local replica; a failure is logged and ignored.
    #[serde(default = "default_true")]
    pub fetch_root_key: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            canister_id: default_canister_id(),
            fetch_root_key: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConnectConfig {
    /// Reject settings the transport cannot work with
    pub fn validate(&self) -> Result<(), ConnectError> {
        let url = url::Url::parse(&self.host)
            .map_err(|e| ConnectError::InvalidConfig(format!("host '{}': {}", self.host, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConnectError::InvalidConfig(format!(
                "host '{}' must use http or https",
                self.host
            )));
        }
        if self.canister_id.trim().is_empty() {
            return Err(ConnectError::InvalidConfig(
                "canister id must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConnectError::InvalidConfig(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_canister_id() -> String {
    DEFAULT_CANISTER_ID.to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConnectConfig::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.canister_id, DEFAULT_CANISTER_ID);
        assert!(config.fetch_root_key);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_host_rejected() {
        let config = ConnectConfig {
            host: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConnectError::InvalidConfig(_))
        ));

        let config = ConnectConfig {
            host: "ftp://127.0.0.1:4943".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_canister_rejected() {
        let config = ConnectConfig {
            canister_id: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ConnectConfig =
            serde_json::from_str(r#"{"host": "http://10.0.0.5:4943"}"#).unwrap();
        assert_eq!(config.host, "http://10.0.0.5:4943");
        assert_eq!(config.canister_id, DEFAULT_CANISTER_ID);
        assert_eq!(config.timeout_secs, 30);
    }
}
