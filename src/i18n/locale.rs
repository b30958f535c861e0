// src/i18n/locale.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    NotFound(String),
}

impl std::fmt::Display for LocaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(code) => write!(f, "Unsupported locale: {}", code),
        }
    }
}

impl std::error::Error for LocaleError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Uz,
    En,
    Ru,
    Ja,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::Uz, Locale::En, Locale::Ru, Locale::Ja];
    pub const DEFAULT: Locale = Locale::Uz;

    pub fn code(self) -> &'static str {
        match self {
            Locale::Uz => "uz",
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::Ja => "ja",
        }
    }

    /// Name of the language in that language, for the switcher menu.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::Uz => "O'zbekcha",
            Locale::En => "English",
            Locale::Ru => "Русский",
            Locale::Ja => "日本語",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Locale::Uz => "🇺🇿",
            Locale::En => "🇺🇸",
            Locale::Ru => "🇷🇺",
            Locale::Ja => "🇯🇵",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

/// Maps a requested locale segment onto the supported set.
///
/// There is no fallback to [`Locale::DEFAULT`] here: an unknown code is a
/// not-found outcome. The default only applies when the path carries no
/// locale segment at all.
pub fn resolve(requested: &str) -> Result<Locale, LocaleError> {
    Locale::ALL
        .into_iter()
        .find(|l| l.code() == requested)
        .ok_or_else(|| LocaleError::NotFound(requested.to_string()))
}

/// Re-targets `path` from `current` to `target`, keeping the rest of the path.
///
/// Pure string transformation; the resulting path is not checked for existence.
pub fn switch_locale(path: &str, current: Locale, target: Locale) -> String {
    if current == target {
        return path.to_string();
    }

    let rest = strip_locale_prefix(path, current);
    if rest.is_empty() || rest == "/" {
        format!("/{}", target.code())
    } else {
        format!("/{}{}", target.code(), rest)
    }
}

/// Removes a leading `/{locale}` segment. `/english` is not `/en` + `glish`.
fn strip_locale_prefix(path: &str, locale: Locale) -> &str {
    let prefix = format!("/{}", locale.code());
    match path.strip_prefix(prefix.as_str()) {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '#', '?']) => rest,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_supported() {
        assert_eq!(resolve("ja"), Ok(Locale::Ja));
        assert_eq!(resolve("uz"), Ok(Locale::Uz));
        assert_eq!("ru".parse::<Locale>(), Ok(Locale::Ru));
    }

    #[test]
    fn test_resolve_unsupported_is_not_found() {
        assert_eq!(resolve("fr"), Err(LocaleError::NotFound("fr".into())));
        assert!(resolve("").is_err());
        assert!(resolve("EN").is_err());
    }

    #[test]
    fn test_switch_keeps_rest_of_path() {
        assert_eq!(
            switch_locale("/en/about", Locale::En, Locale::Ru),
            "/ru/about"
        );
        assert_eq!(
            switch_locale("/uz/admin", Locale::Uz, Locale::Ja),
            "/ja/admin"
        );
    }

    #[test]
    fn test_switch_same_locale_is_noop() {
        assert_eq!(switch_locale("/en", Locale::En, Locale::En), "/en");
        assert_eq!(
            switch_locale("/en/whatever", Locale::En, Locale::En),
            "/en/whatever"
        );
    }

    #[test]
    fn test_switch_root() {
        assert_eq!(switch_locale("/en", Locale::En, Locale::Ja), "/ja");
        assert_eq!(switch_locale("/en/", Locale::En, Locale::Ja), "/ja");
    }

    #[test]
    fn test_switch_only_strips_whole_segment() {
        assert_eq!(
            switch_locale("/english", Locale::En, Locale::Ru),
            "/ru/english"
        );
        assert_eq!(
            switch_locale("/en#projects", Locale::En, Locale::Uz),
            "/uz#projects"
        );
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Locale::Ja).unwrap(), "\"ja\"");
        let parsed: Locale = serde_json::from_str("\"uz\"").unwrap();
        assert_eq!(parsed, Locale::Uz);
    }
}
