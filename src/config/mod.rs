use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub mode: Mode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            mode: Mode::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Runtime mode. Only production sets the `Secure` cookie flag.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn is_production(&self) -> bool {
        matches!(self, Mode::Production)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Some(Mode::Development),
            "production" | "prod" => Some(Mode::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite:./data/innkeep.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for identity tokens. Generated per process when unset,
    /// which invalidates every cookie on restart.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Bootstrap admin account, created at startup if missing
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
            admin_email: None,
            admin_password: None,
        }
    }
}

fn default_token_ttl_hours() -> i64 {
    24
}

/// Cloudinary credentials and upload limits
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Per-file limit (default: 5 MiB)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    /// Files accepted per request (default: 10)
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            max_file_bytes: default_max_file_bytes(),
            max_files: default_max_files(),
        }
    }
}

impl ImageConfig {
    /// Upper bound for a whole upload request body
    pub fn max_body_bytes(&self) -> usize {
        self.max_file_bytes * self.max_files + 1024 * 1024
    }
}

fn default_max_file_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_max_files() -> usize {
    10
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleConfig {
    /// OAuth client ID that Google ID tokens must be issued for
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| "Failed to parse configuration file")?
        } else {
            info!("No config file found, using defaults");
            Config::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay environment variables on top of the file configuration.
    /// `lookup` is injected so tests never touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        if let Some(mode) = lookup("APP_ENV") {
            self.server.mode = Mode::parse(&mode)
                .with_context(|| format!("Invalid APP_ENV value: {}", mode))?;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(email) = lookup("ADMIN_EMAIL") {
            self.auth.admin_email = Some(email);
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.auth.admin_password = Some(password);
        }
        if let Some(name) = lookup("CLOUDINARY_CLOUD_NAME") {
            self.images.cloud_name = Some(name);
        }
        if let Some(key) = lookup("CLOUDINARY_API_KEY") {
            self.images.api_key = Some(key);
        }
        if let Some(secret) = lookup("CLOUDINARY_API_SECRET") {
            self.images.api_secret = Some(secret);
        }
        if let Some(client_id) = lookup("GOOGLE_CLIENT_ID") {
            self.google.client_id = Some(client_id);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// The token signing secret, generating an ephemeral one if none is configured
    pub fn jwt_secret(&mut self) -> String {
        if let Some(secret) = self.auth.jwt_secret.as_ref().filter(|s| !s.is_empty()) {
            return secret.clone();
        }
        warn!("No JWT secret configured; generating an ephemeral one");
        let secret = format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple());
        self.auth.jwt_secret = Some(secret.clone());
        secret
    }
}
