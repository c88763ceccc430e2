use serde::Deserialize;

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_ws_port() -> u16 {
    8443
}

const fn default_max_connections() -> usize {
    100
}

const fn default_max_pending_per_connection() -> usize {
    100
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_keepalive_interval_secs() -> u64 {
    10
}

const fn default_keepalive_timeout_secs() -> u64 {
    120
}

const fn default_chunk_size() -> usize {
    65_536
}

const fn default_nonce_window_secs() -> u64 {
    300
}

const fn default_timestamp_window_secs() -> u64 {
    300
}

const fn default_reassembly_idle_ttl_secs() -> u64 {
    300
}

const fn default_body_max_bytes() -> usize {
    10 * 1024 * 1024
}

const fn default_jwt_ttl_seconds() -> u64 {
    3600
}

fn default_verify_mode() -> VerifyMode {
    VerifyMode::None
}

/// `anpx-gateway`'s complete configuration surface. Loaded from a TOML
/// file, with `ANPX_<SECTION>_<KEY>` environment overrides applied by
/// the CLI entrypoint on top of this struct once parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub ws: WsConfig,
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    #[serde(default = "default_max_pending_per_connection")]
    pub max_pending_per_connection: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_keepalive_interval_secs")]
    pub keepalive_interval_secs: u64,
    #[serde(default = "default_keepalive_timeout_secs")]
    pub keepalive_timeout_secs: u64,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_nonce_window_secs")]
    pub nonce_window_secs: u64,
    #[serde(default = "default_timestamp_window_secs")]
    pub timestamp_window_secs: u64,
    #[serde(default = "default_reassembly_idle_ttl_secs")]
    pub reassembly_idle_ttl_secs: u64,
    #[serde(default = "default_body_max_bytes")]
    pub body_max_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            ws: WsConfig::default(),
            tls: TlsConfig::default(),
            jwt: JwtConfig::default(),
            max_connections: default_max_connections(),
            max_pending_per_connection: default_max_pending_per_connection(),
            request_timeout_secs: default_request_timeout_secs(),
            keepalive_interval_secs: default_keepalive_interval_secs(),
            keepalive_timeout_secs: default_keepalive_timeout_secs(),
            chunk_size: default_chunk_size(),
            nonce_window_secs: default_nonce_window_secs(),
            timestamp_window_secs: default_timestamp_window_secs(),
            reassembly_idle_ttl_secs: default_reassembly_idle_ttl_secs(),
            body_max_bytes: default_body_max_bytes(),
        }
    }
}

impl Config {
    /// Parses a TOML configuration file's contents. The CLI entrypoint
    /// is responsible for reading the file and applying
    /// `ANPX_`-prefixed environment overrides on top.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(input)?;
        if config.chunk_size == 0 {
            return Err(serde::de::Error::custom(
                "chunk_size must be nonzero",
            ));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    #[serde(default = "default_http_port")]
    pub bind_port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            bind_port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WsConfig {
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    #[serde(default = "default_ws_port")]
    pub bind_port: u16,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            bind_port: default_ws_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMode {
    None,
    Optional,
    Required,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub ca_file: Option<String>,
    #[serde(default = "default_verify_mode")]
    pub verify_mode: VerifyMode,
}

impl Default for VerifyMode {
    fn default() -> Self {
        VerifyMode::None
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub private_key_file: Option<String>,
    pub public_key_file: Option<String>,
    #[serde(default = "default_jwt_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            private_key_file: None,
            public_key_file: None,
            ttl_seconds: default_jwt_ttl_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sane() {
        let config = Config::default();
        assert_eq!(config.max_connections, 100);
        assert_eq!(config.max_pending_per_connection, 100);
        assert_eq!(config.chunk_size, 65_536);
        assert_eq!(config.nonce_window_secs, 300);
        assert_eq!(config.jwt.ttl_seconds, 3600);
        assert_eq!(config.tls.verify_mode, VerifyMode::None);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let toml = r#"
            chunk_size = 0
        "#;
        assert!(Config::from_toml_str(toml).is_err());
    }

    #[test]
    fn parses_a_minimal_toml_document() {
        let toml = r#"
            [http]
            bind_port = 9000

            [ws]
            bind_port = 9443
        "#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.http.bind_port, 9000);
        assert_eq!(config.ws.bind_port, 9443);
        assert_eq!(config.max_connections, 100);
    }
}
