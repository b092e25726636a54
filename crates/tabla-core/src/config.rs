use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Where and how the Sveriges Radio open API is queried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Fixed `size=` for every list request.  No further pages are fetched.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsConfig {
    /// Requested number of channels in the list.  Absent, zero or negative
    /// means the default of 10.
    #[serde(default)]
    pub limit: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Start the live stream of the first channel whose schedule is shown,
    /// as long as nothing is playing yet.
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
    #[serde(default = "default_volume")]
    pub default_volume: f32,
    /// Explicit mpv binary; searched beside the executable and on PATH otherwise.
    #[serde(default)]
    pub mpv_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            user_agent: default_user_agent(),
            request_timeout_secs: None,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: default_autoplay(),
            default_volume: default_volume(),
            mpv_path: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.sr.se/api/v2".to_string()
}

fn default_page_size() -> u32 {
    500
}

fn default_user_agent() -> String {
    format!("tabla/{}", env!("CARGO_PKG_VERSION"))
}

fn default_autoplay() -> bool {
    true
}

fn default_volume() -> f32 {
    0.5
}

fn default_http_enabled() -> bool {
    false
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8990
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.sr.se/api/v2");
        assert_eq!(config.api.page_size, 500);
        assert!(config.api.request_timeout_secs.is_none());
        assert!(config.channels.limit.is_none());
        assert!(config.player.autoplay);
        assert!(!config.http.enabled);
        assert_eq!(config.http.port, 8990);
        assert!(Config::config_path().ends_with("tabla/config.toml"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
            [channels]
            limit = 25

            [player]
            autoplay = false
            "#,
        )
        .unwrap();
        assert_eq!(config.channels.limit, Some(25.0));
        assert!(!config.player.autoplay);
        assert_eq!(config.player.default_volume, 0.5);
        assert_eq!(config.api.page_size, 500);
        assert_eq!(config.http.bind_address, "127.0.0.1");
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = Config::default();
        config.api.request_timeout_secs = Some(15);
        config.http.enabled = true;
        let text = toml::to_string_pretty(&config).unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert_eq!(back.api.request_timeout_secs, Some(15));
        assert!(back.http.enabled);
    }
}
