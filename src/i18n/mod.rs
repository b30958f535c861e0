// ## FILE: src/i18n/mod.rs
pub mod locale;

pub use locale::{resolve, switch_locale, Locale, LocaleError};

use crate::core::prelude::{AppError, Result};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(RustEmbed)]
#[folder = "src/i18n/langs/"]
pub struct Langs;

#[derive(Debug, Clone)]
struct Entry {
    text: String,
}

impl Entry {
    fn format(&self, params: &[&str]) -> String {
        params
            .iter()
            .enumerate()
            .fold(self.text.clone(), |text, (i, param)| {
                text.replace(&format!("{{{}}}", i), param)
            })
    }
}

/// All four catalogs, loaded once from the embedded JSON files.
struct Catalogs {
    by_locale: HashMap<Locale, HashMap<String, Entry>>,
}

impl Catalogs {
    fn load() -> Self {
        let mut by_locale = HashMap::new();
        for locale in Locale::ALL {
            match Self::load_entries(locale) {
                Ok(entries) => {
                    by_locale.insert(locale, entries);
                }
                Err(e) => log::error!("Locale catalog '{}' failed to load: {}", locale, e),
            }
        }
        Self { by_locale }
    }

    fn load_entries(locale: Locale) -> Result<HashMap<String, Entry>> {
        let filename = format!("{}.json", locale.code());
        let content = Langs::get(&filename)
            .ok_or_else(|| AppError::Validation(format!("File not found: {}", filename)))?;

        let raw: HashMap<String, String> = serde_json::from_slice(content.data.as_ref())
            .map_err(|e| AppError::Validation(format!("{}: {}", filename, e)))?;

        Ok(raw
            .into_iter()
            .map(|(key, text)| (key, Entry { text }))
            .collect())
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&Entry> {
        self.by_locale
            .get(&locale)
            .and_then(|entries| entries.get(key))
            .or_else(|| {
                self.by_locale
                    .get(&Locale::DEFAULT)
                    .and_then(|entries| entries.get(key))
            })
    }
}

static CATALOGS: LazyLock<Catalogs> = LazyLock::new(Catalogs::load);

/// Loads the catalogs eagerly so a broken JSON file shows up at startup.
pub fn init() -> Result<()> {
    let missing: Vec<&str> = Locale::ALL
        .iter()
        .filter(|l| !CATALOGS.by_locale.contains_key(*l))
        .map(|l| l.code())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing locale catalogs: {}",
            missing.join(", ")
        )))
    }
}

pub fn get_translation(locale: Locale, key: &str, params: &[&str]) -> String {
    match CATALOGS.lookup(locale, key) {
        Some(entry) => entry.format(params),
        None => format!("Missing: {}", key),
    }
}

pub fn has_translation(locale: Locale, key: &str) -> bool {
    CATALOGS
        .by_locale
        .get(&locale)
        .is_some_and(|entries| entries.contains_key(key))
}

/// The key→string mapping for one locale, default-locale entries filling gaps.
pub fn messages_for(locale: Locale) -> HashMap<String, String> {
    let mut messages: HashMap<String, String> = CATALOGS
        .by_locale
        .get(&Locale::DEFAULT)
        .map(|entries| {
            entries
                .iter()
                .map(|(k, e)| (k.clone(), e.text.clone()))
                .collect()
        })
        .unwrap_or_default();

    if let Some(entries) = CATALOGS.by_locale.get(&locale) {
        for (key, entry) in entries {
            messages.insert(key.clone(), entry.text.clone());
        }
    }
    messages
}

#[macro_export]
macro_rules! t {
    ($locale:expr, $key:expr) => { $crate::i18n::get_translation($locale, $key, &[]) };
    ($locale:expr, $key:expr, $($arg:expr),+) => { $crate::i18n::get_translation($locale, $key, &[$($arg),+]) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_catalogs_load() {
        assert!(init().is_ok());
    }

    #[test]
    fn test_catalogs_share_keys() {
        let reference = messages_for(Locale::En);
        for locale in Locale::ALL {
            for key in reference.keys() {
                assert!(
                    has_translation(locale, key),
                    "{} is missing {}",
                    locale,
                    key
                );
            }
        }
    }

    #[test]
    fn test_translation_per_locale() {
        assert_eq!(get_translation(Locale::En, "nav.blog", &[]), "Blog");
        assert_eq!(get_translation(Locale::Ru, "nav.home", &[]), "Главная");
        assert_eq!(t!(Locale::Ja, "nav.home"), "ホーム");
    }

    #[test]
    fn test_positional_params() {
        assert_eq!(t!(Locale::En, "blog.by", "Ada"), "By Ada");
        assert_eq!(t!(Locale::En, "admin.total", "3"), "Total: 3");
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(t!(Locale::En, "nope.key"), "Missing: nope.key");
    }
}
