// =====================================================
// FILE: src/setup/setup_toml.rs - DEFAULT CONFIG
// =====================================================

use crate::core::constants::{CONFIG_DIR, CONFIG_FILE};
use crate::core::prelude::*;
use std::path::PathBuf;
use tokio::fs;

const DEFAULT_CONFIG: &str = r#"[general]
# error | warn | info | debug | trace (RUST_LOG overrides this)
log_level = "info"
site_title = "Portfolio - Full Stack Developer"

[server]
host = "127.0.0.1"
port = 3000
workers = 2
shutdown_timeout = 5
# Directory with images and other static files, served under /static
# static_dir = "public"
enable_cors = false

[store]
# memory    = in-process store, optionally snapshotted to data_file
# firestore = hosted Firestore database (REST); without project_id the
#             server starts offline and logs a warning
# offline   = no database; every section shows the built-in example data
backend = "memory"
data_file = ".portfolio/content.json"
project_id = ""
database = "(default)"
api_key = ""

[auth]
# local    = accounts listed below
# firebase = Firebase email/password sign-in (needs api_key)
provider = "local"
api_key = ""
salt = ""
# Dashboard sessions end after this many idle minutes
session_ttl_minutes = 720

# Passwords may be plaintext or "$sha256$<hex of salt:password>".
# [[auth.accounts]]
# email = "admin@example.com"
# password = "change-me"
# display_name = "Admin"
"#;

pub async fn ensure_config_exists() -> Result<PathBuf> {
    let base_dir = crate::core::helpers::get_base_dir()?;

    let config_dir = base_dir.join(CONFIG_DIR);
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .await
            .map_err(AppError::Io)?;
        log::debug!("Config directory created: {}", config_dir.display());
    }

    let config_path = config_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, DEFAULT_CONFIG)
            .await
            .map_err(AppError::Io)?;
        log::info!("Config file created: {}", config_path.display());
        log::info!("Add an [[auth.accounts]] entry to enable the admin dashboard");
    }

    Ok(config_path)
}

pub fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(base_dir) = crate::core::helpers::get_base_dir() {
        paths.push(base_dir.join(CONFIG_DIR).join(CONFIG_FILE));
        paths.push(base_dir.join(CONFIG_FILE));
        paths.push(base_dir.join("config").join(CONFIG_FILE));
    }
    #[cfg(debug_assertions)]
    {
        paths.push(PathBuf::from(CONFIG_FILE));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.auth.accounts.is_empty());
        assert!(config.store.data_file.is_some());
    }

    #[test]
    fn test_config_paths_end_with_file_name() {
        for path in get_config_paths() {
            assert!(path.ends_with(CONFIG_FILE));
        }
    }
}
