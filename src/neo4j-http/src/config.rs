use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Client configuration, loadable from a JSON file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_url")]
    pub url: String,

    /// Optional `"user:password"` credential.
    #[serde(default)]
    pub auth: Option<String>,

    /// Maximum pooled connections.
    #[serde(default = "default_maxsize")]
    pub maxsize: usize,

    /// Resolve hostnames through a caching resolver.
    #[serde(default)]
    pub use_dns_cache: bool,

    /// Default request timeout in milliseconds; absent means none.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_url() -> String {
    "http://127.0.0.1:7474/".to_string()
}

fn default_maxsize() -> usize {
    20
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|err| Error::Serialization(err.into()))?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            auth: None,
            maxsize: default_maxsize(),
            use_dns_cache: false,
            request_timeout_ms: None,
        }
    }
}
