// src/main.rs
use portfolio_server::core::config::Config;
use portfolio_server::{i18n, server, Result};

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::load_with_messages(false).await?;
    init_logger(&config.log_level);

    if let Some(path) = config.config_path() {
        log::info!("Config loaded from {}", path);
    }
    config.log_startup();

    i18n::init()?;
    log::debug!("Locale catalogs loaded");

    server::run(config).await
}

/// `RUST_LOG` wins over the configured level.
fn init_logger(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}
