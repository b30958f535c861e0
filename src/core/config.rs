// src/core/config.rs
use crate::core::constants::{
    APP_TITLE, DEFAULT_HOST, DEFAULT_PORT, ENV_PORT, ENV_STORE_API_KEY, VERSION,
};
use crate::core::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// TOML Configuration Structure
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    general: GeneralConfig,
    #[serde(default)]
    server: Option<ServerConfigToml>,
    #[serde(default)]
    store: Option<StoreConfigToml>,
    #[serde(default)]
    auth: Option<AuthConfigToml>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeneralConfig {
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_site_title")]
    site_title: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            site_title: default_site_title(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ServerConfigToml {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_workers")]
    workers: usize,
    #[serde(default = "default_shutdown_timeout")]
    shutdown_timeout: u64,
    #[serde(default)]
    static_dir: Option<String>,
    #[serde(default)]
    enable_cors: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct StoreConfigToml {
    #[serde(default = "default_store_backend")]
    backend: String,
    #[serde(default)]
    data_file: Option<String>,
    #[serde(default)]
    project_id: String,
    #[serde(default = "default_database")]
    database: String,
    #[serde(default)]
    api_key: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct AuthConfigToml {
    #[serde(default = "default_auth_provider")]
    provider: String,
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    salt: String,
    #[serde(default = "default_session_ttl_minutes")]
    session_ttl_minutes: u64,
    #[serde(default)]
    accounts: Vec<AccountToml>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct AccountToml {
    #[serde(default)]
    id: Option<String>,
    email: String,
    password: String,
    #[serde(default)]
    display_name: Option<String>,
}

// Default Functions
fn default_log_level() -> String {
    "info".into()
}
fn default_site_title() -> String {
    "Portfolio - Full Stack Developer".into()
}
fn default_host() -> String {
    DEFAULT_HOST.into()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_workers() -> usize {
    2
}
fn default_shutdown_timeout() -> u64 {
    5
}
fn default_store_backend() -> String {
    "memory".into()
}
fn default_database() -> String {
    "(default)".into()
}
fn default_auth_provider() -> String {
    "local".into()
}
fn default_session_ttl_minutes() -> u64 {
    720
}

// Main Configuration Structures
#[derive(Debug, Clone)]
pub struct Config {
    config_path: Option<String>,
    pub log_level: String,
    pub site_title: String,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub shutdown_timeout: u64,
    pub static_dir: Option<PathBuf>,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Firestore,
    /// Every read and write fails; pages run on the compiled-in example data.
    Offline,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_file: Option<PathBuf>,
    pub project_id: String,
    pub database: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProviderKind {
    Local,
    Firebase,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub provider: AuthProviderKind,
    pub api_key: String,
    pub salt: String,
    /// Idle minutes before a dashboard session is dropped.
    pub session_ttl_minutes: u64,
    pub accounts: Vec<Account>,
}

#[derive(Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: 2,
            shutdown_timeout: 5,
            static_dir: None,
            enable_cors: false,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            data_file: None,
            project_id: String::new(),
            database: default_database(),
            api_key: String::new(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider: AuthProviderKind::Local,
            api_key: String::new(),
            salt: String::new(),
            session_ttl_minutes: default_session_ttl_minutes(),
            accounts: Vec::new(),
        }
    }
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "firestore" => Ok(Self::Firestore),
            "offline" => Ok(Self::Offline),
            other => Err(AppError::Config(format!("Unknown store backend '{}'", other))),
        }
    }
}

impl AuthProviderKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "firebase" => Ok(Self::Firebase),
            other => Err(AppError::Config(format!("Unknown auth provider '{}'", other))),
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        Self::load_with_messages(true).await
    }

    pub async fn load_with_messages(show_messages: bool) -> Result<Self> {
        // Try existing configs
        for path in crate::setup::setup_toml::get_config_paths() {
            if path.exists() {
                match Self::from_file(&path).await {
                    Ok(mut config) => {
                        config.apply_env_overrides();
                        if show_messages {
                            Self::log_startup(&config);
                        }
                        return Ok(config);
                    }
                    Err(e) => log::warn!("Skipping config {}: {}", path.display(), e),
                }
            }
        }

        // Create new config
        let path = crate::setup::setup_toml::ensure_config_exists().await?;
        let mut config = Self::from_file(&path).await?;
        config.apply_env_overrides();

        if show_messages {
            log::info!("New config: {}", path.display());
            Self::log_startup(&config);
        }
        Ok(config)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(AppError::Io)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.as_ref().to_string_lossy().into_owned());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| AppError::Config(format!("TOML: {}", e)))?;

        let server = file
            .server
            .map_or_else(ServerConfig::default, |s| ServerConfig {
                host: s.host,
                port: s.port,
                workers: s.workers.max(1),
                shutdown_timeout: s.shutdown_timeout,
                static_dir: s.static_dir.filter(|d| !d.is_empty()).map(PathBuf::from),
                enable_cors: s.enable_cors,
            });

        let store = match file.store {
            Some(s) => StoreConfig {
                backend: StoreBackend::parse(&s.backend)?,
                data_file: s.data_file.filter(|f| !f.is_empty()).map(PathBuf::from),
                project_id: s.project_id,
                database: s.database,
                api_key: s.api_key,
            },
            None => StoreConfig::default(),
        };

        let auth = match file.auth {
            Some(a) => AuthConfig {
                provider: AuthProviderKind::parse(&a.provider)?,
                api_key: a.api_key,
                salt: a.salt,
                session_ttl_minutes: a.session_ttl_minutes.max(1),
                accounts: a
                    .accounts
                    .into_iter()
                    .map(|acc| Account {
                        id: acc
                            .id
                            .filter(|id| !id.is_empty())
                            .unwrap_or_else(|| acc.email.clone()),
                        email: acc.email,
                        password: acc.password,
                        display_name: acc.display_name.filter(|n| !n.is_empty()),
                    })
                    .collect(),
            },
            None => AuthConfig::default(),
        };

        Ok(Self {
            config_path: None,
            log_level: file.general.log_level,
            site_title: file.general.site_title,
            server,
            store,
            auth,
        })
    }

    pub fn config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var(ENV_PORT) {
            match port.parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => log::warn!("Ignoring invalid {}={}", ENV_PORT, port),
            }
        }
        if let Ok(key) = std::env::var(ENV_STORE_API_KEY) {
            if !key.is_empty() {
                self.store.api_key = key;
            }
        }
    }

    pub fn log_startup(&self) {
        log::info!("{} v{}", APP_TITLE, VERSION);
        log::info!(
            "Server Config: {}:{}, Workers: {}, Store: {:?}, Auth: {:?}",
            self.server.host,
            self.server.port,
            self.server.workers,
            self.store.backend,
            self.auth.provider
        );
        if self.auth.provider == AuthProviderKind::Local && self.auth.accounts.is_empty() {
            log::warn!("No admin accounts configured; the dashboard is read-only");
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            log_level: default_log_level(),
            site_title: default_site_title(),
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_toml_str("[general]\n").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.auth.provider, AuthProviderKind::Local);
        assert!(config.auth.accounts.is_empty());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
[general]
log_level = "debug"

[server]
host = "0.0.0.0"
port = 8088
workers = 0
static_dir = "public"

[store]
backend = "firestore"
project_id = "profile-demo"

[auth]
provider = "local"
salt = "pepper"

[[auth.accounts]]
email = "admin@example.com"
password = "secret"
display_name = "Admin"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.workers, 1);
        assert_eq!(config.server.static_dir, Some(PathBuf::from("public")));
        assert_eq!(config.store.backend, StoreBackend::Firestore);
        assert_eq!(config.store.database, "(default)");
        assert_eq!(config.auth.accounts.len(), 1);
        assert_eq!(config.auth.accounts[0].id, "admin@example.com");
        assert_eq!(config.auth.accounts[0].display_name.as_deref(), Some("Admin"));
    }

    #[test]
    fn test_firestore_without_project_id_still_loads() {
        let toml = "[general]\n[store]\nbackend = \"firestore\"\n";
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Firestore);
        assert!(config.store.project_id.is_empty());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.site_title, default_site_title());
        assert_eq!(config.log_level, "info");

        let config = Config::from_toml_str("[store]\nbackend = \"offline\"\n").unwrap();
        assert_eq!(config.store.backend, StoreBackend::Offline);
        assert_eq!(config.site_title, default_site_title());
        assert_eq!(config.auth.session_ttl_minutes, 720);
    }

    #[test]
    fn test_session_ttl() {
        let toml = "[auth]\nsession_ttl_minutes = 30\n";
        assert_eq!(Config::from_toml_str(toml).unwrap().auth.session_ttl_minutes, 30);
        let toml = "[auth]\nsession_ttl_minutes = 0\n";
        assert_eq!(Config::from_toml_str(toml).unwrap().auth.session_ttl_minutes, 1);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let toml = "[general]\n[store]\nbackend = \"mongo\"\n";
        assert!(Config::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_account_debug_hides_password() {
        let account = Account {
            id: "1".into(),
            email: "a@b.c".into(),
            password: "hunter2".into(),
            display_name: None,
        };
        assert!(!format!("{:?}", account).contains("hunter2"));
    }
}
