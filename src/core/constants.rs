pub const APP_TITLE: &str = "PORTFOLIO SERVER";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

pub const CONFIG_DIR: &str = ".portfolio";
pub const CONFIG_FILE: &str = "portfolio.toml";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

pub const SESSION_COOKIE: &str = "portfolio_session";

pub const ENV_PORT: &str = "PORTFOLIO_PORT";
pub const ENV_STORE_API_KEY: &str = "PORTFOLIO_STORE_API_KEY";
