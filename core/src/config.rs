//! Transport configuration.
//!
//! Defaults are usable as-is; `from_env` applies environment overrides:
//!
//! - `APICLIENT_HTTP_TIMEOUT_SECS`: whole-request timeout, `0` disables it
//! - `APICLIENT_USER_AGENT`
//! - `APICLIENT_MAX_RESPONSE_BYTES`

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
    pub max_response_bytes: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("apiclient/", env!("CARGO_PKG_VERSION")).to_string(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl TransportConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str| lookup(key).and_then(|s| s.parse::<u64>().ok());
        if let Some(secs) = number("APICLIENT_HTTP_TIMEOUT_SECS") {
            self.timeout_secs = (secs > 0).then_some(secs);
        }
        if let Some(agent) = lookup("APICLIENT_USER_AGENT").filter(|s| !s.trim().is_empty()) {
            self.user_agent = agent;
        }
        if let Some(limit) = number("APICLIENT_MAX_RESPONSE_BYTES") {
            self.max_response_bytes = limit;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn overridden(vars: &[(&str, &str)]) -> TransportConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TransportConfig::default().with_overrides(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.user_agent.starts_with("apiclient/"));
        assert_eq!(config.max_response_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn env_overrides_apply() {
        let config = overridden(&[
            ("APICLIENT_HTTP_TIMEOUT_SECS", "5"),
            ("APICLIENT_USER_AGENT", "fetcher/1"),
            ("APICLIENT_MAX_RESPONSE_BYTES", "1024"),
        ]);
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent, "fetcher/1");
        assert_eq!(config.max_response_bytes, 1024);
    }

    #[test]
    fn zero_timeout_disables_and_garbage_is_ignored() {
        let config = overridden(&[
            ("APICLIENT_HTTP_TIMEOUT_SECS", "0"),
            ("APICLIENT_MAX_RESPONSE_BYTES", "lots"),
            ("APICLIENT_USER_AGENT", "  "),
        ]);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.max_response_bytes, DEFAULT_MAX_RESPONSE_BYTES);
        assert!(config.user_agent.starts_with("apiclient/"));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: TransportConfig = serde_json::from_str(r#"{"timeout_secs": null}"#).unwrap();
        assert_eq!(config.timeout(), None);
        assert_eq!(config.max_response_bytes, DEFAULT_MAX_RESPONSE_BYTES);
    }
}
