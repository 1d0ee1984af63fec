use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL (`POSTGRESSTRING` / `DATABASE_URL` override it)
    pub postgres_url: Option<String>,
    pub database: PoolConfig,
    /// HS256 secret for bearer tokens (`JWT_SECRET` overrides it)
    pub jwt_secret: Option<String>,
    pub image_store: ImageStoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "farm_market.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            gateway: GatewayConfig::default(),
            postgres_url: None,
            database: PoolConfig::default(),
            jwt_secret: None,
            image_store: ImageStoreConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Whole request body limit; the image itself is capped separately.
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 10 << 20,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Apply `migrations/` on startup
    pub run_migrations: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout_secs: 5,
            run_migrations: true,
        }
    }
}

/// GitHub repository used as the image host.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ImageStoreConfig {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub author_name: String,
    pub author_email: String,
    pub product_dir: String,
    pub farm_dir: String,
    pub timeout_secs: u64,
    /// Never read from yaml; only `GH_ACCESS_TOKEN` sets it.
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Default for ImageStoreConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            owner: "farm-market".to_string(),
            repo: "productImages".to_string(),
            branch: "main".to_string(),
            author_name: "farm-market-bot".to_string(),
            author_email: "bot@farm-market.local".to_string(),
            product_dir: "Products".to_string(),
            farm_dir: "Farms".to_string(),
            timeout_secs: 30,
            access_token: None,
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml` (defaults when the file is absent), then apply
    /// environment overrides.
    pub fn load(env_name: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env_name);
        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                path: config_path.clone(),
                source,
            })?;
            serde_yaml::from_str(&content)?
        } else {
            AppConfig::default()
        };

        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay process environment values. Takes a lookup so tests need not
    /// touch the real environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.gateway.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT",
                value: port,
            })?;
        }
        if let Some(url) = lookup("POSTGRESSTRING").or_else(|| lookup("DATABASE_URL")) {
            self.postgres_url = Some(url);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = Some(secret);
        }
        if let Some(token) = lookup("GH_ACCESS_TOKEN") {
            self.image_store.access_token = Some(token);
        }
        Ok(())
    }

    pub fn postgres_url(&self) -> Result<&str, ConfigError> {
        self.postgres_url
            .as_deref()
            .ok_or(ConfigError::Missing("POSTGRESSTRING"))
    }

    pub fn jwt_secret(&self) -> Result<&str, ConfigError> {
        self.jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))
    }
}
