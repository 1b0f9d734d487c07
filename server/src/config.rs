//! Configuration management for the gateway

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub backends: BackendsConfig,
    pub session: SessionConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the service that issues tokens.
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    pub dialog_url: String,
    pub users_url: String,
    pub connect_timeout_ms: u64,
    /// Deadline applied to every single backend call.
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub redis_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
}

impl BackendsConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl NotificationsConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Config {
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let mut config = if Path::new(path).exists() {
            let content = fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read config file {}", path))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("failed to parse config file {}", path))?
        } else {
            let config = Config::default();
            let content = toml::to_string_pretty(&config)?;
            fs::write(path, content)
                .await
                .with_context(|| format!("failed to write default config to {}", path))?;
            tracing::info!("Created default config at {}", path);
            config
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies deployment overrides (`SECRETKEY`, `REDIS_ADDR`,
    /// `REDIS_PASSWORD`, `NOTIFICATIONS_URL`) on top of the file values.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(secret) = non_empty("SECRETKEY") {
            self.auth.jwt_secret = secret;
        }

        if let Some(addr) = non_empty("REDIS_ADDR") {
            let mut url = Url::parse(&format!("redis://{}/0", addr))?;
            if let Some(password) = non_empty("REDIS_PASSWORD") {
                url.set_password(Some(&password))
                    .map_err(|_| anyhow::anyhow!("REDIS_ADDR cannot carry a password"))?;
            }
            self.session.redis_url = url.to_string();
        }

        if let Some(base_url) = non_empty("NOTIFICATIONS_URL") {
            self.notifications.base_url = base_url;
        }

        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            anyhow::bail!("auth.jwt_secret is empty; set it in the config file or via SECRETKEY");
        }
        Url::parse(&self.notifications.base_url)
            .map_err(|e| anyhow::anyhow!("notifications.base_url is invalid: {}", e))?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            auth: AuthConfig {
                jwt_secret: "CHANGE-THIS-JWT-SECRET".to_string(),
            },
            backends: BackendsConfig {
                dialog_url: "http://127.0.0.1:9001".to_string(),
                users_url: "http://127.0.0.1:9000".to_string(),
                connect_timeout_ms: 3000,
                request_timeout_ms: 5000,
            },
            session: SessionConfig {
                redis_url: "redis://127.0.0.1:6379/0".to_string(),
                token_ttl_secs: None,
            },
            notifications: NotificationsConfig {
                base_url: "http://127.0.0.1:8082/notifications".to_string(),
                connect_timeout_ms: 3000,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.backends.request_timeout(), Duration::from_secs(5));
        assert!(parsed.session.token_ttl_secs.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[
                ("SECRETKEY", "s3cret"),
                ("REDIS_ADDR", "cache:6380"),
                ("REDIS_PASSWORD", "p@ss"),
                ("NOTIFICATIONS_URL", "http://notify:9090/api"),
            ]))
            .unwrap();

        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.session.redis_url, "redis://:p%40ss@cache:6380/0");
        assert_eq!(config.notifications.base_url, "http://notify:9090/api");
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[("SECRETKEY", "  "), ("REDIS_ADDR", "")]))
            .unwrap();

        assert_eq!(config.auth.jwt_secret, "CHANGE-THIS-JWT-SECRET");
        assert_eq!(config.session.redis_url, "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let mut config = Config::default();
        config.auth.jwt_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let config = Config::load(path).await.unwrap();
        assert!(Path::new(path).exists());
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
