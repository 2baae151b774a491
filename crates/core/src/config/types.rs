use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Server configuration
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
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Logging configuration. `RUST_LOG` still wins over `level` when set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Password whitelist authorization.
///
/// When `enabled` is false every caller is authorized, adult content included.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub passwords: Vec<PasswordEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasswordEntry {
    pub password: String,
    /// Whether this password unlocks adult sources.
    #[serde(default)]
    pub adult: bool,
}

/// Search fan-out settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Per-source request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts on transport failure (default: 0)
    #[serde(default)]
    pub retry: u32,
    /// User-Agent sent to sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retry: 0,
            user_agent: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// A content source entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub code: String,
    pub name: String,
    /// API endpoint queried with the search keyword
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub adult: bool,
}

fn default_true() -> bool {
    true
}

/// Sanitized config for API responses (passwords redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub auth: SanitizedAuthConfig,
    pub search: SearchConfig,
    pub sources: Vec<SanitizedSourceConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub enabled: bool,
    pub passwords_configured: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSourceConfig {
    pub code: String,
    pub name: String,
    pub enabled: bool,
    pub adult: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            log: config.log.clone(),
            auth: SanitizedAuthConfig {
                enabled: config.auth.enabled,
                passwords_configured: config.auth.passwords.len(),
            },
            search: config.search.clone(),
            sources: config
                .sources
                .iter()
                .map(|s| SanitizedSourceConfig {
                    code: s.code.clone(),
                    name: s.name.clone(),
                    enabled: s.enabled,
                    adult: s.adult,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Text);
        assert!(!config.auth.enabled);
        assert_eq!(config.search.timeout_secs, 10);
        assert_eq!(config.search.retry, 0);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[log]
level = "debug"
format = "json"

[auth]
enabled = true

[[auth.passwords]]
password = "family"

[[auth.passwords]]
password = "grownup"
adult = true

[search]
timeout_secs = 5
retry = 2

[[sources]]
code = "alpha"
name = "Alpha"
url = "https://alpha.example/api.php/provide/vod/"

[[sources]]
code = "beta"
name = "Beta"
url = "https://beta.example/api.php/provide/vod/"
enabled = false
adult = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.auth.passwords.len(), 2);
        assert!(!config.auth.passwords[0].adult);
        assert!(config.auth.passwords[1].adult);
        assert_eq!(config.search.timeout(), Duration::from_secs(5));
        assert_eq!(config.search.retry, 2);

        // enabled defaults to true, adult to false
        assert!(config.sources[0].enabled);
        assert!(!config.sources[0].adult);
        assert!(!config.sources[1].enabled);
        assert!(config.sources[1].adult);
    }

    #[test]
    fn test_source_requires_url() {
        let toml = r#"
[[sources]]
code = "alpha"
name = "Alpha"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_hides_passwords() {
        let toml = r#"
[auth]
enabled = true

[[auth.passwords]]
password = "top-secret"
adult = true

[[sources]]
code = "alpha"
name = "Alpha"
url = "https://alpha.example/api"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.auth.enabled);
        assert_eq!(sanitized.auth.passwords_configured, 1);
        assert_eq!(sanitized.sources.len(), 1);
        assert_eq!(sanitized.sources[0].code, "alpha");

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("top-secret"));
        assert!(!json.contains("alpha.example"));
    }
}
