use config::{Config, ConfigError, Environment, File};
use domain::playlist::ActivationScope;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ENV_PREFIX: &str = "SIGNAGE";
/// Upper bound for every interval setting (one day)
const MAX_INTERVAL_SECS: u64 = 86_400;
const MAX_MISSED_THRESHOLD: u32 = 1_000;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
    #[serde(default = "default_missed_threshold")]
    pub missed_threshold: u32,
    #[serde(default = "default_liveness_check")]
    pub liveness_check_secs: u64,
    #[serde(default)]
    pub activation_scope: ActivationScope,
    /// Admin UI assets, served at `/` when set
    #[serde(default)]
    pub static_dir: Option<String>,
}

fn default_listen_port() -> u16 {
    3000
}
fn default_heartbeat_interval() -> u64 {
    30
}
fn default_missed_threshold() -> u32 {
    2
}
fn default_liveness_check() -> u64 {
    15
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            heartbeat_interval_secs: default_heartbeat_interval(),
            missed_threshold: default_missed_threshold(),
            liveness_check_secs: default_liveness_check(),
            activation_scope: ActivationScope::default(),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let config: Self = layered(config_dir)
            .set_default("listen_port", default_listen_port())?
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_interval_secs == 0 || self.liveness_check_secs == 0 {
            return Err(ConfigError::Message(
                "heartbeat_interval_secs and liveness_check_secs must be positive".into(),
            ));
        }
        if self.heartbeat_interval_secs > MAX_INTERVAL_SECS
            || self.liveness_check_secs > MAX_INTERVAL_SECS
        {
            return Err(ConfigError::Message(format!(
                "heartbeat_interval_secs and liveness_check_secs must not exceed {MAX_INTERVAL_SECS}"
            )));
        }
        if self.missed_threshold > MAX_MISSED_THRESHOLD {
            return Err(ConfigError::Message(format!(
                "missed_threshold must not exceed {MAX_MISSED_THRESHOLD}"
            )));
        }
        Ok(())
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn liveness_check_interval(&self) -> Duration {
        Duration::from_secs(self.liveness_check_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    #[serde(default = "default_retry_initial")]
    pub initial_ms: u64,
    #[serde(default = "default_retry_max")]
    pub max_ms: u64,
}

fn default_retry_initial() -> u64 {
    1000
}
fn default_retry_max() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_ms: default_retry_initial(),
            max_ms: default_retry_max(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlayerConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub tv_ids: Vec<String>,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_server_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_refresh_interval() -> u64 {
    10
}

impl PlayerConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let config: Self = layered(config_dir)
            .set_default("server_url", default_server_url())?
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_interval_secs == 0 || self.refresh_interval_secs == 0 {
            return Err(ConfigError::Message(
                "heartbeat_interval_secs and refresh_interval_secs must be positive".into(),
            ));
        }
        if self.heartbeat_interval_secs > MAX_INTERVAL_SECS
            || self.refresh_interval_secs > MAX_INTERVAL_SECS
            || self.retry.max_ms > MAX_INTERVAL_SECS * 1000
        {
            return Err(ConfigError::Message(format!(
                "intervals must not exceed {MAX_INTERVAL_SECS} seconds"
            )));
        }
        if self.retry.initial_ms == 0 || self.retry.max_ms < self.retry.initial_ms {
            return Err(ConfigError::Message(
                "retry.initial_ms must be positive and not above retry.max_ms".into(),
            ));
        }
        Ok(())
    }
}

/// defaults -> `{dir}/default` -> `{dir}/{RUN_MODE}` -> `SIGNAGE__*` env
fn layered(config_dir: &str) -> config::builder::ConfigBuilder<config::builder::DefaultState> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
        .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
        // e.g. SIGNAGE__LISTEN_PORT=8080, SIGNAGE__RETRY__MAX_MS=60000
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("tv_ids")
                .try_parsing(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults_without_files() {
        let config = ServerConfig::load("/nonexistent-signage-config").unwrap();
        assert_eq!(config.listen_port, 3000);
        assert_eq!(config.heartbeat_interval_secs, 30);
        assert_eq!(config.missed_threshold, 2);
        assert_eq!(config.liveness_check_secs, 15);
        assert_eq!(config.activation_scope, ActivationScope::Overlapping);
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_player_defaults_without_files() {
        let config = PlayerConfig::load("/nonexistent-signage-config").unwrap();
        assert_eq!(config.server_url, "http://localhost:3000");
        assert_eq!(config.refresh_interval_secs, 10);
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn test_reads_toml_file() {
        let dir = std::env::temp_dir().join(format!("signage-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("default.toml"),
            "server_url = \"http://signage:3000\"\ntv_ids = [\"TV1\", \"TV2\"]\n\n[retry]\nmax_ms = 5000\n",
        )
        .unwrap();

        let config = PlayerConfig::load(dir.to_str().unwrap()).unwrap();
        assert_eq!(config.server_url, "http://signage:3000");
        assert_eq!(config.tv_ids, vec!["TV1", "TV2"]);
        assert_eq!(config.retry.max_ms, 5000);
        assert_eq!(config.retry.initial_ms, 1000);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rejects_zero_intervals() {
        let config = ServerConfig {
            liveness_check_secs: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_liveness_settings() {
        let slow = ServerConfig {
            heartbeat_interval_secs: u64::MAX / 2,
            ..ServerConfig::default()
        };
        assert!(slow.validate().is_err());

        let patient = ServerConfig {
            missed_threshold: u32::MAX,
            ..ServerConfig::default()
        };
        assert!(patient.validate().is_err());

        let day = ServerConfig {
            heartbeat_interval_secs: MAX_INTERVAL_SECS,
            missed_threshold: MAX_MISSED_THRESHOLD,
            ..ServerConfig::default()
        };
        assert!(day.validate().is_ok());
    }
}
