// Core essentials used across the crate
pub use crate::core::config::Config;
pub use crate::core::error::{AppError, Result};

pub use std::time::{Duration, Instant};

pub use crate::i18n::{get_translation, Locale};
