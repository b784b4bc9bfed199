/// Environment variable overriding the system default locale.
pub const DEFAULT_LOCALE_ENV: &str = "LOCALE_KIT_DEFAULT_LOCALE";

/// Environment variable naming the locale used when nothing else is available.
pub const FALLBACK_LOCALE_ENV: &str = "LOCALE_KIT_FALLBACK_LOCALE";

/// Inbound `Accept-Language` header, as exposed to CGI-style request handlers.
pub const ACCEPT_LANGUAGE_ENV: &str = "HTTP_ACCEPT_LANGUAGE";

#[derive(Debug, Clone)]
pub struct Config {
    // Locale defaults
    pub default_locale: Option<String>,
    pub fallback_locale: String,

    // Request
    pub accept_language: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            default_locale: non_empty_var(DEFAULT_LOCALE_ENV),
            fallback_locale: non_empty_var(FALLBACK_LOCALE_ENV)
                .unwrap_or_else(|| "en".to_string()),

            accept_language: non_empty_var(ACCEPT_LANGUAGE_ENV),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var(DEFAULT_LOCALE_ENV);
        std::env::remove_var(FALLBACK_LOCALE_ENV);
        std::env::remove_var(ACCEPT_LANGUAGE_ENV);

        let config = Config::from_env();
        assert_eq!(config.default_locale, None);
        assert_eq!(config.fallback_locale, "en");
        assert_eq!(config.accept_language, None);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        std::env::set_var(DEFAULT_LOCALE_ENV, "de-de");
        std::env::set_var(FALLBACK_LOCALE_ENV, "fr");
        std::env::set_var(ACCEPT_LANGUAGE_ENV, "zh,en;q=0.5");

        let config = Config::from_env();
        assert_eq!(config.default_locale.as_deref(), Some("de-de"));
        assert_eq!(config.fallback_locale, "fr");
        assert_eq!(config.accept_language.as_deref(), Some("zh,en;q=0.5"));

        std::env::remove_var(DEFAULT_LOCALE_ENV);
        std::env::remove_var(FALLBACK_LOCALE_ENV);
        std::env::remove_var(ACCEPT_LANGUAGE_ENV);
    }

    #[test]
    #[serial]
    fn test_blank_values_are_ignored() {
        std::env::set_var(DEFAULT_LOCALE_ENV, "   ");

        let config = Config::from_env();
        assert_eq!(config.default_locale, None);

        std::env::remove_var(DEFAULT_LOCALE_ENV);
    }
}
