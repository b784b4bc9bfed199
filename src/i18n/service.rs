//! Locale service: the seam between value objects and locale data.
//!
//! [`LocaleService`] groups every locale query the crate needs. The built-in
//! [`DefaultLocaleService`] implements it over the lenient tag parser and the
//! embedded display-name tables; tests and embedders can supply their own.

use crate::config::Config;
use crate::i18n::accept;
use crate::i18n::registry::{DisplayNameRegistry, NameKind};
use crate::i18n::tag::LocaleId;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Locale queries: canonicalization, decomposition, display names and
/// negotiation.
///
/// Implementations never fail: malformed tags produce best-effort results.
pub trait LocaleService: Send + Sync + Debug {
    /// Canonical form of `tag` (e.g., `zh-hant-tw` → `zh_Hant_TW`).
    fn canonicalize(&self, tag: &str) -> String;

    /// Subtag map with keys `language`, `script`, `region`, `variantN` and
    /// `privateN`. Absent subtags are omitted.
    fn parse(&self, tag: &str) -> BTreeMap<String, String>;

    /// Keywords after `@`, keys lower-cased.
    fn keywords(&self, tag: &str) -> BTreeMap<String, String>;

    /// Build a tag from a subtag map as produced by [`LocaleService::parse`].
    fn compose(&self, subtags: &BTreeMap<String, String>) -> String;

    /// Name of the tag's language rendered in `in_locale`.
    fn display_language(&self, tag: &str, in_locale: &str) -> String;

    /// Name of the tag's region rendered in `in_locale`; empty without a region.
    fn display_region(&self, tag: &str, in_locale: &str) -> String;

    /// Name of the tag's script rendered in `in_locale`; empty without a script.
    fn display_script(&self, tag: &str, in_locale: &str) -> String;

    /// Best available locale for an HTTP `Accept-Language` header.
    ///
    /// # Returns
    /// * `Some(tag)` for the first range, by descending quality, that names an
    ///   available locale exactly or after truncation
    /// * `None` if nothing is negotiable
    fn accept_from_http(&self, header: &str) -> Option<String>;

    /// RFC 4647 basic filtering: does `tag` fall under `range`?
    ///
    /// # Arguments
    /// * `tag` - The tag being tested
    /// * `range` - A language range; `*` matches everything
    /// * `canonicalize` - Canonicalize both sides before comparing
    fn filter_matches(&self, tag: &str, range: &str, canonicalize: bool) -> bool;

    /// The process default locale tag.
    fn default_tag(&self) -> String;
}

/// Locale service backed by the embedded tables.
#[derive(Debug, Clone)]
pub struct DefaultLocaleService {
    default_tag: String,
}

/// Global service instance (initialized lazily from the environment)
static SERVICE: OnceLock<Arc<DefaultLocaleService>> = OnceLock::new();

/// The shared default service, built from [`Config::from_env`] on first use.
///
/// Every call returns a handle to the same instance.
pub fn default_service() -> Arc<dyn LocaleService> {
    SERVICE
        .get_or_init(|| Arc::new(DefaultLocaleService::from_config(&Config::from_env())))
        .clone()
}

impl DefaultLocaleService {
    /// Service whose default tag is `default_tag` (canonicalized).
    ///
    /// # Arguments
    /// * `default_tag` - Any tag the lenient parser accepts (e.g., "de-de")
    pub fn new(default_tag: &str) -> Self {
        Self {
            default_tag: LocaleId::parse(default_tag).to_canonical(),
        }
    }

    /// Resolve the default tag: configured override, then OS locale, then
    /// the configured fallback.
    ///
    /// # Arguments
    /// * `config` - Supplies `default_locale` and `fallback_locale`
    ///
    /// # Returns
    /// A service whose [`LocaleService::default_tag`] is canonical, e.g.
    /// `en_US` for an OS locale of `en_US.UTF-8`.
    pub fn from_config(config: &Config) -> Self {
        let default_tag = config
            .default_locale
            .clone()
            .or_else(|| sys_locale::get_locale().and_then(|l| normalize_os_locale(&l)))
            .unwrap_or_else(|| config.fallback_locale.clone());

        let service = Self::new(&default_tag);
        debug!("Default locale resolved to {}", service.default_tag);
        service
    }

    fn display(&self, kind: NameKind, code: &str, in_locale: &str) -> String {
        DisplayNameRegistry::get()
            .name(kind, code, &self.canonicalize(in_locale))
            .unwrap_or(code)
            .to_string()
    }
}

/// Strip encoding and modifier suffixes; `C` and `POSIX` carry no locale.
fn normalize_os_locale(raw: &str) -> Option<String> {
    let locale = raw.split(['.', '@']).next().unwrap_or_default().trim();
    if locale.is_empty() || locale == "C" || locale == "POSIX" {
        return None;
    }
    Some(locale.to_string())
}

impl LocaleService for DefaultLocaleService {
    fn canonicalize(&self, tag: &str) -> String {
        LocaleId::parse(tag).to_canonical()
    }

    fn parse(&self, tag: &str) -> BTreeMap<String, String> {
        LocaleId::parse(tag).to_subtag_map()
    }

    fn keywords(&self, tag: &str) -> BTreeMap<String, String> {
        LocaleId::parse(tag).keywords
    }

    fn compose(&self, subtags: &BTreeMap<String, String>) -> String {
        LocaleId::from_subtag_map(subtags).to_canonical()
    }

    fn display_language(&self, tag: &str, in_locale: &str) -> String {
        let id = LocaleId::parse(tag);
        if id.language.is_empty() {
            return String::new();
        }
        self.display(NameKind::Language, &id.language, in_locale)
    }

    fn display_region(&self, tag: &str, in_locale: &str) -> String {
        match LocaleId::parse(tag).region {
            Some(region) => self.display(NameKind::Region, &region, in_locale),
            None => String::new(),
        }
    }

    fn display_script(&self, tag: &str, in_locale: &str) -> String {
        match LocaleId::parse(tag).script {
            Some(script) => self.display(NameKind::Script, &script, in_locale),
            None => String::new(),
        }
    }

    fn accept_from_http(&self, header: &str) -> Option<String> {
        accept::negotiate(header, DisplayNameRegistry::get().available()).map(str::to_string)
    }

    fn filter_matches(&self, tag: &str, range: &str, canonicalize: bool) -> bool {
        if range.trim() == "*" {
            return true;
        }

        let prepare = |value: &str| {
            let value = if canonicalize {
                self.canonicalize(value)
            } else {
                value.to_string()
            };
            // keywords never take part in range matching
            let base = value.split('@').next().unwrap_or_default();
            base.replace('-', "_").to_ascii_lowercase()
        };

        let tag = prepare(tag);
        let range = prepare(range);
        if range.is_empty() {
            return false;
        }
        tag == range || tag.starts_with(&format!("{}_", range))
    }

    fn default_tag(&self) -> String {
        self.default_tag.clone()
    }
}
