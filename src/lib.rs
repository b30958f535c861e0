// Module definitions
pub mod auth;
pub mod content;
pub mod core;
pub mod i18n;
pub mod server;
pub mod setup;
pub mod store;

// Essential re-exports
pub use content::{ContentKind, ContentSection, LoadOutcome, ViewMode, WriteRejected};
pub use core::config::Config;
pub use core::error::{AppError, Result};
pub use i18n::{resolve, switch_locale, Locale};

// Main entry point
pub async fn run() -> Result<()> {
    let config = Config::load().await?;
    run_with_config(config).await
}

pub async fn run_with_config(config: Config) -> Result<()> {
    server::run(config).await
}

pub async fn load_config() -> Result<Config> {
    Config::load().await
}
