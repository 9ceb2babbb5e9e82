use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

/// Client-side configuration, parsed from the TOML asset embedded in
/// the UI bundle. Every key has a default so an empty document is a
/// valid config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the task/auth API, no trailing slash.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// How long transient notices stay on screen, in milliseconds.
    #[serde(default = "default_notice_ms")]
    pub notice_ms: u32,
}

impl ClientConfig {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let config: ClientConfig =
            toml::from_str(raw).context("failed parsing client config")?;
        debug!(api_base = %config.api_base, "loaded client config");
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            notice_ms: default_notice_ms(),
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:8000".to_string()
}

fn default_notice_ms() -> u32 {
    2_500
}

#[cfg(test)]
mod tests {
    use super::ClientConfig;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ClientConfig::parse("").expect("parse empty config");
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn explicit_keys_override_defaults() {
        let config = ClientConfig::parse(
            "api_base = \"https://tasks.example.net\"\nnotice_ms = 1000\n",
        )
        .expect("parse config");
        assert_eq!(config.api_base, "https://tasks.example.net");
        assert_eq!(config.notice_ms, 1_000);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(ClientConfig::parse("api_base = [").is_err());
    }
}
