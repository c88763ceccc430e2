use serde::Deserialize;

fn default_max_pending() -> usize {
    100
}

fn default_queue_bound() -> usize {
    32
}

fn default_chunk_size() -> usize {
    65_536
}

fn default_reconnect_initial_secs() -> u64 {
    5
}

fn default_reconnect_factor() -> u32 {
    2
}

fn default_reconnect_max_secs() -> u64 {
    300
}

/// `anpx-receiver`'s configuration surface, loaded the same way
/// `anpx-gateway`'s `Config` is (TOML file plus `ANPX_<SECTION>_<KEY>`
/// environment overrides applied by the CLI entrypoint).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The gateway's tunnel WebSocket endpoint, e.g.
    /// `wss://gateway.example.test/tunnel`.
    pub tunnel_url: String,
    /// The DID-WBA `Authorization` header value presented on dial.
    /// Generating this value is an external collaborator's concern;
    /// the receiver only carries it.
    pub authorization: String,
    /// Base URL of the local application this receiver forwards to,
    /// e.g. `http://127.0.0.1:3000`.
    pub local_app_url: String,
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
    #[serde(default = "default_queue_bound")]
    pub queue_bound: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_reconnect_initial_secs")]
    pub initial_secs: u64,
    #[serde(default = "default_reconnect_factor")]
    pub factor: u32,
    #[serde(default = "default_reconnect_max_secs")]
    pub max_secs: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_secs: default_reconnect_initial_secs(),
            factor: default_reconnect_factor(),
            max_secs: default_reconnect_max_secs(),
        }
    }
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(input)?;
        if config.chunk_size == 0 {
            return Err(serde::de::Error::custom("chunk_size must be nonzero"));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sane() {
        let toml = r#"
            tunnel_url = "wss://gateway.example.test/tunnel"
            authorization = "DIDWba did=..."
            local_app_url = "http://127.0.0.1:3000"
        "#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.max_pending, 100);
        assert_eq!(config.reconnect.initial_secs, 5);
        assert_eq!(config.reconnect.factor, 2);
        assert_eq!(config.reconnect.max_secs, 300);
        assert_eq!(config.chunk_size, 65_536);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let toml = r#"
            tunnel_url = "wss://gateway.example.test/tunnel"
            authorization = "DIDWba did=..."
            local_app_url = "http://127.0.0.1:3000"
            chunk_size = 0
        "#;
        assert!(Config::from_toml_str(toml).is_err());
    }
}
