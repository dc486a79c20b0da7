//! # Application State
//!
//! Shared state for the Axum application: configuration, the auth gate,
//! and the tokenization service with its gateway and store handles. All of
//! it is built once at startup and lives for the whole process.

use crate::auth::{BoxedAuthenticator, JwtAuthenticator};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use vault_core::{BoxedStore, CardTokenizationService, MemoryStore, VaultError, VaultResult};
use vault_paymob::{PaymobConfig, PaymobGateway};
use vault_store::SqliteStore;

/// Optional settings file, looked up relative to the working directory
const CONFIG_PATHS: [&str; 3] = [
    "config/card-vault.toml",
    "../config/card-vault.toml",
    "../../config/card-vault.toml",
];

/// Settings read from `config/card-vault.toml`. Environment variables win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub environment: Option<String>,
    pub database_url: Option<String>,
    pub auth_jwt_secret: Option<String>,
    pub paymob_api_base_url: Option<String>,
    pub paymob_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Value for an environment-style key
    fn get(&self, key: &str) -> Option<String> {
        match key {
            "HOST" => self.host.clone(),
            "PORT" => self.port.map(|p| p.to_string()),
            "ENVIRONMENT" => self.environment.clone(),
            "DATABASE_URL" => self.database_url.clone(),
            "AUTH_JWT_SECRET" => self.auth_jwt_secret.clone(),
            "PAYMOB_API_BASE_URL" => self.paymob_api_base_url.clone(),
            "PAYMOB_TIMEOUT_SECS" => self.paymob_timeout_secs.map(|s| s.to_string()),
            _ => None,
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// SQLite URL; `None` keeps payment methods in memory
    pub database_url: Option<String>,
    /// Secret verifying caller identity tokens
    pub auth_jwt_secret: String,
    /// Gateway settings
    pub paymob: PaymobConfig,
}

impl AppConfig {
    /// Load from `.env`, the optional config file, and the environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let file = load_config_file()?;
        let config = Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key)))?;
        Ok(config)
    }

    /// Build from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> VaultResult<Self> {
        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| VaultError::Configuration(format!("PORT is not a valid port: {}", p)))?,
            None => 8080,
        };

        let auth_jwt_secret = lookup("AUTH_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| VaultError::Configuration("AUTH_JWT_SECRET not set".to_string()))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            auth_jwt_secret,
            paymob: PaymobConfig::from_lookup(&lookup)?,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> VaultResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| VaultError::Configuration(format!("Invalid socket address: {}", e)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tokenization pipeline
    pub service: CardTokenizationService,
    /// Auth gate
    pub authenticator: BoxedAuthenticator,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment: Paymob gateway, configured store,
    /// JWT auth gate.
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::load()?;

        let gateway = PaymobGateway::new(config.paymob.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize Paymob: {}", e))?;

        let store = open_store(config.database_url.as_deref()).await?;
        let authenticator = Arc::new(JwtAuthenticator::new(&config.auth_jwt_secret));

        Ok(Self::from_parts(
            config,
            CardTokenizationService::new(Arc::new(gateway), store),
            authenticator,
        ))
    }

    /// Assemble state from prebuilt parts
    pub fn from_parts(
        config: AppConfig,
        service: CardTokenizationService,
        authenticator: BoxedAuthenticator,
    ) -> Self {
        Self {
            service,
            authenticator,
            config,
        }
    }
}

/// Open the payment method store once for the process lifetime.
async fn open_store(database_url: Option<&str>) -> anyhow::Result<BoxedStore> {
    match database_url {
        Some(url) => {
            let store = SqliteStore::connect(url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, payment methods are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Load the optional settings file
fn load_config_file() -> anyhow::Result<FileConfig> {
    for path in CONFIG_PATHS {
        if let Ok(content) = std::fs::read_to_string(path) {
            let file: FileConfig = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded settings from {}", path);
            return Ok(file);
        }
    }

    Ok(FileConfig::default())
}
