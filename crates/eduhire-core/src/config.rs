use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Coins granted the first time a user completes a topic.
pub const DEFAULT_TOPIC_REWARD_COINS: i64 = 10;
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Top-level config (eduhire.toml + EDUHIRE_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EduhireConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub learning: LearningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            auth: AuthConfig::default(),
        }
    }
}

/// How the gateway builds the authenticated request context. Token issuance
/// lives outside this service; the gateway only checks what it is handed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Trust the `X-User-Id` header (an upstream proxy has authenticated).
    #[default]
    Header,
    /// Additionally require `Authorization: Bearer <token>`.
    Token,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    #[serde(default = "default_topic_reward")]
    pub topic_reward_coins: i64,
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            topic_reward_coins: DEFAULT_TOPIC_REWARD_COINS,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_topic_reward() -> i64 {
    DEFAULT_TOPIC_REWARD_COINS
}
fn default_leaderboard_size() -> usize {
    DEFAULT_LEADERBOARD_SIZE
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.eduhire/eduhire.db", home)
}

impl EduhireConfig {
    /// Load config from a TOML file with EDUHIRE_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `EDUHIRE_LEARNING__TOPIC_REWARD_COINS=25`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(&path))
                .merge(Env::prefixed("EDUHIRE_").split("__")),
        )
    }

    fn from_figment(figment: Figment) -> crate::error::Result<Self> {
        figment
            .extract()
            .map_err(|e| crate::error::EduhireError::Config(e.to_string()))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.eduhire/eduhire.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = EduhireConfig::from_figment(Figment::new().merge(Toml::string(""))).unwrap();
        assert_eq!(cfg.gateway.port, DEFAULT_PORT);
        assert_eq!(cfg.gateway.auth.mode, AuthMode::Header);
        assert_eq!(cfg.learning.topic_reward_coins, 10);
        assert_eq!(cfg.learning.leaderboard_size, 10);
    }

    #[test]
    fn toml_overrides_sections() {
        let toml = r#"
            [gateway]
            port = 8080
            [gateway.auth]
            mode = "token"
            token = "s3cret"
            [learning]
            topic_reward_coins = 25
        "#;
        let cfg = EduhireConfig::from_figment(Figment::new().merge(Toml::string(toml))).unwrap();
        assert_eq!(cfg.gateway.port, 8080);
        assert_eq!(cfg.gateway.bind, DEFAULT_BIND);
        assert_eq!(cfg.gateway.auth.mode, AuthMode::Token);
        assert_eq!(cfg.gateway.auth.token.as_deref(), Some("s3cret"));
        assert_eq!(cfg.learning.topic_reward_coins, 25);
    }

    #[test]
    fn bad_value_is_config_error() {
        let toml = "[gateway]\nport = \"not-a-port\"\n";
        let err = EduhireConfig::from_figment(Figment::new().merge(Toml::string(toml)))
            .unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
