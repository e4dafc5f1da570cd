use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use super::ConfigError;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub freshservice: FreshServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where tickets come from for a run
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApiMode {
    Staging,
    Production,
    /// Read tickets from a local JSON fixture instead of the API
    Test,
}

impl ApiMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMode::Staging => "staging",
            ApiMode::Production => "production",
            ApiMode::Test => "test",
        }
    }
}

impl FromStr for ApiMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staging" => Ok(ApiMode::Staging),
            "production" => Ok(ApiMode::Production),
            "test" => Ok(ApiMode::Test),
            other => Err(ConfigError::ValidationError(format!(
                "unknown mode: {:?} (expected staging, production or test)",
                other
            ))),
        }
    }
}

/// FreshService API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FreshServiceConfig {
    /// API key of the agent the tool acts as
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the staging API (e.g., "https://acme-sandbox.freshservice.com/api/v2")
    #[serde(default)]
    pub staging_endpoint: Option<String>,
    /// Base URL of the production API
    #[serde(default)]
    pub production_endpoint: Option<String>,
    /// Agent whose tickets `mine` scopes fetch
    #[serde(default)]
    pub agent_id: Option<u64>,
    /// Group whose tickets `group` scopes fetch
    #[serde(default)]
    pub group_id: Option<u64>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Wait between consecutive API calls in milliseconds (default: 250)
    #[serde(default = "default_time_wait")]
    pub time_wait_ms: u64,
    /// Agent portal ticket URL prefix used for HTML links
    #[serde(default)]
    pub portal_url: Option<String>,
}

impl FreshServiceConfig {
    /// Base URL for the given mode (test mode has none).
    pub fn endpoint(&self, mode: ApiMode) -> Option<&str> {
        match mode {
            ApiMode::Staging => self.staging_endpoint.as_deref(),
            ApiMode::Production => self.production_endpoint.as_deref(),
            ApiMode::Test => None,
        }
    }
}

impl Default for FreshServiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            staging_endpoint: None,
            production_endpoint: None,
            agent_id: None,
            group_id: None,
            timeout_secs: default_timeout(),
            time_wait_ms: default_time_wait(),
            portal_url: None,
        }
    }
}

fn default_timeout() -> u32 {
    30
}

fn default_time_wait() -> u64 {
    250
}

/// Log output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Directory for per-run log files; logs go to stderr when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Web form server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    5000
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub freshservice: SanitizedFreshServiceConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

/// Sanitized FreshService config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedFreshServiceConfig {
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,
    pub timeout_secs: u32,
    pub time_wait_ms: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let fs = &config.freshservice;
        Self {
            freshservice: SanitizedFreshServiceConfig {
                api_key_configured: !fs.api_key.is_empty(),
                staging_endpoint: fs.staging_endpoint.clone(),
                production_endpoint: fs.production_endpoint.clone(),
                agent_id: fs.agent_id,
                group_id: fs.group_id,
                timeout_secs: fs.timeout_secs,
                time_wait_ms: fs.time_wait_ms,
            },
            logging: config.logging.clone(),
            server: config.server.clone(),
        }
    }
}
