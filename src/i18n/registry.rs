//! Display-name registry: localized names of languages, scripts and regions.
//!
//! The tables are a CLDR-derived subset embedded at compile time. The registry
//! uses a singleton pattern with `OnceLock`, is parsed on first access and
//! stays immutable thereafter.

use crate::i18n::tag::LocaleId;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tracing::{debug, error, warn};

/// Display-name tables JSON embedded at compile time.
static DISPLAY_NAMES_JSON: &str = include_str!("../../data/display_names.json");

/// Which kind of subtag a name is looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Language,
    Script,
    Region,
}

/// Names of subtags as rendered in one display locale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayNames {
    #[serde(default)]
    pub languages: HashMap<String, String>,

    #[serde(default)]
    pub scripts: HashMap<String, String>,

    #[serde(default)]
    pub regions: HashMap<String, String>,
}

impl DisplayNames {
    fn table(&self, kind: NameKind) -> &HashMap<String, String> {
        match kind {
            NameKind::Language => &self.languages,
            NameKind::Script => &self.scripts,
            NameKind::Region => &self.regions,
        }
    }
}

/// Global display-name registry singleton.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayNameRegistry {
    /// Locales negotiable through Accept-Language, in canonical form
    available: Vec<String>,

    /// Name tables keyed by canonical display locale
    locales: BTreeMap<String, DisplayNames>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<DisplayNameRegistry> = OnceLock::new();

impl DisplayNameRegistry {
    /// Get the registry built from the embedded tables.
    pub fn get() -> &'static DisplayNameRegistry {
        REGISTRY.get_or_init(|| match serde_json::from_str::<DisplayNameRegistry>(DISPLAY_NAMES_JSON) {
            Ok(registry) => {
                debug!(
                    "Loaded display names for {} locales, {} available",
                    registry.locales.len(),
                    registry.available.len()
                );
                registry
            }
            Err(e) => {
                error!("Embedded display-name table is invalid: {}", e);
                DisplayNameRegistry::default()
            }
        })
    }

    /// Locales that content negotiation may select.
    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// Check if a canonical locale ID is negotiable (case-insensitive).
    pub fn is_available(&self, locale: &str) -> bool {
        self.find_available(locale).is_some()
    }

    /// The registry's spelling of an available locale.
    pub fn find_available(&self, locale: &str) -> Option<&str> {
        self.available
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(locale))
            .map(String::as_str)
    }

    /// Look up `code` rendered in `display_locale`, walking the display
    /// locale's parent chain (`zh_Hant_TW` → `zh_Hant` → `zh`).
    ///
    /// Returns `None` when no table on the chain has a name for `code`.
    pub fn name(&self, kind: NameKind, code: &str, display_locale: &str) -> Option<&str> {
        let chain = LocaleId::parse(display_locale).fallback_chain();
        let tables: Vec<&DisplayNames> = chain
            .iter()
            .filter_map(|locale| self.locales.get(locale))
            .collect();

        if tables.is_empty() {
            warn!(
                "No display names for locale '{}', rendering codes as-is",
                display_locale
            );
        }

        tables
            .into_iter()
            .find_map(|names| names.table(kind).get(code))
            .map(String::as_str)
    }
}
