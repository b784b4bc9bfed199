//! Language type: a canonicalized locale tag and its subtags.
//!
//! `Language` never rejects a tag. Whatever the locale service makes of the
//! input becomes the canonical code, and the subtags are re-derived from it
//! on every [`Language::set`].

use crate::config::Config;
use crate::i18n::{default_service, LocaleService};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Regional and historical Chinese language codes spoken under the `zh`
/// umbrella.
pub const SPOKEN_PRIMARIES: &[(&str, &str)] = &[
    ("cdo", "zh"),
    ("cjy", "zh"),
    ("cmn", "zh"),
    ("cpx", "zh"),
    ("czh", "zh"),
    ("czo", "zh"),
    ("gan", "zh"),
    ("hak", "zh"),
    ("hsn", "zh"),
    ("mnp", "zh"),
    ("nan", "zh"),
    ("wuu", "zh"),
    ("yue", "zh"),
    ("och", "zh"),
    ("ltc", "zh"),
    ("lzh", "zh"),
];

/// Umbrella code whose speakers put the family name first.
const CHINESE: &str = "zh";

/// A language given either as a raw tag or as an existing instance.
#[derive(Debug, Clone, Copy)]
pub enum LanguageRef<'a> {
    Tag(&'a str),
    Language(&'a Language),
}

impl<'a> From<&'a str> for LanguageRef<'a> {
    fn from(tag: &'a str) -> Self {
        LanguageRef::Tag(tag)
    }
}

impl<'a> From<&'a String> for LanguageRef<'a> {
    fn from(tag: &'a String) -> Self {
        LanguageRef::Tag(tag.as_str())
    }
}

impl<'a> From<&'a Language> for LanguageRef<'a> {
    fn from(language: &'a Language) -> Self {
        LanguageRef::Language(language)
    }
}

/// A canonicalized language tag.
///
/// Compare with [`Language::equals`]; there is no `PartialEq`.
#[derive(Debug, Clone)]
pub struct Language {
    code: String,
    primary: String,
    script: Option<String>,
    region: Option<String>,
    variants: Vec<String>,
    keywords: BTreeMap<String, String>,
    service: Arc<dyn LocaleService>,
}

impl Language {
    /// Create a language from a tag or another `Language`, using the shared
    /// default locale service.
    pub fn new<'a>(code: impl Into<LanguageRef<'a>>) -> Self {
        Self::with_service(default_service(), code)
    }

    /// Create a language bound to a specific locale service.
    pub fn with_service<'a>(
        service: Arc<dyn LocaleService>,
        code: impl Into<LanguageRef<'a>>,
    ) -> Self {
        let mut language = Language {
            code: String::new(),
            primary: String::new(),
            script: None,
            region: None,
            variants: Vec::new(),
            keywords: BTreeMap::new(),
            service,
        };
        language.set(code);
        language
    }

    /// Replace the tag, re-deriving every subtag.
    pub fn set<'a>(&mut self, code: impl Into<LanguageRef<'a>>) -> &mut Self {
        let code = match code.into() {
            LanguageRef::Tag(tag) => self.service.canonicalize(tag),
            LanguageRef::Language(other) => self.service.canonicalize(&other.code),
        };

        let mut subtags = self.service.parse(&code);
        self.primary = subtags.remove("language").unwrap_or_default();
        self.script = subtags.remove("script");
        self.region = subtags.remove("region");

        self.variants.clear();
        let mut idx = 0;
        while let Some(variant) = subtags.remove(&format!("variant{}", idx)) {
            self.variants.push(variant);
            idx += 1;
        }

        self.keywords = self.service.keywords(&code);
        self.code = code;
        self
    }

    /// Build a language from individual subtags. Empty strings are skipped.
    pub fn compose(
        primary: &str,
        script: Option<&str>,
        region: Option<&str>,
        variants: &[&str],
        privates: &[&str],
    ) -> Self {
        Self::compose_with(default_service(), primary, script, region, variants, privates)
    }

    /// Same as [`Language::compose`] with an explicit locale service.
    pub fn compose_with(
        service: Arc<dyn LocaleService>,
        primary: &str,
        script: Option<&str>,
        region: Option<&str>,
        variants: &[&str],
        privates: &[&str],
    ) -> Self {
        let mut subtags = BTreeMap::new();
        subtags.insert("language".to_string(), primary.to_string());
        if let Some(script) = script.filter(|s| !s.is_empty()) {
            subtags.insert("script".to_string(), script.to_string());
        }
        if let Some(region) = region.filter(|r| !r.is_empty()) {
            subtags.insert("region".to_string(), region.to_string());
        }
        for (idx, variant) in variants.iter().filter(|v| !v.is_empty()).enumerate() {
            subtags.insert(format!("variant{}", idx), variant.to_string());
        }
        for (idx, private) in privates.iter().filter(|p| !p.is_empty()).enumerate() {
            subtags.insert(format!("private{}", idx), private.to_string());
        }

        let code = service.compose(&subtags);
        Self::with_service(service, code.as_str())
    }

    /// The process default language.
    pub fn system_default() -> Self {
        Self::system_default_with(default_service())
    }

    pub fn system_default_with(service: Arc<dyn LocaleService>) -> Self {
        let tag = service.default_tag();
        Self::with_service(service, tag.as_str())
    }

    /// Negotiate a language from an `Accept-Language` header.
    ///
    /// With `None` or a blank header, the inbound header is read from
    /// `HTTP_ACCEPT_LANGUAGE`.
    /// Regional Chinese ranges such as `zh-tw` negotiate to plain `zh`; parse
    /// the header yourself when that distinction matters.
    pub fn from_http_header(header: Option<&str>) -> Self {
        Self::from_http_header_with(default_service(), header)
    }

    pub fn from_http_header_with(service: Arc<dyn LocaleService>, header: Option<&str>) -> Self {
        let header = match header.filter(|h| !h.trim().is_empty()) {
            Some(header) => header.to_string(),
            None => Config::from_env().accept_language.unwrap_or_default(),
        };

        let tag = match service.accept_from_http(&header) {
            Some(tag) => tag,
            None => {
                debug!(
                    "Nothing negotiable in Accept-Language '{}', using default locale",
                    header
                );
                service.default_tag()
            }
        };
        Self::with_service(service, tag.as_str())
    }

    /// Umbrella code for `lang`'s primary subtag; `None` in, `None` out.
    pub fn spoken_primary<'a>(lang: Option<impl Into<LanguageRef<'a>>>) -> Option<String> {
        Self::spoken_primary_with(default_service(), lang)
    }

    /// Same as [`Language::spoken_primary`], resolving raw tags through
    /// `service`. Instances keep the primary they were built with.
    pub fn spoken_primary_with<'a>(
        service: Arc<dyn LocaleService>,
        lang: Option<impl Into<LanguageRef<'a>>>,
    ) -> Option<String> {
        let spoken = match lang?.into() {
            LanguageRef::Language(language) => language.spoken().to_string(),
            LanguageRef::Tag(tag) => Language::with_service(service, tag).spoken().to_string(),
        };
        Some(spoken)
    }

    /// Umbrella code for this language's primary subtag (`yue` → `zh`).
    pub fn spoken(&self) -> &str {
        spoken(&self.primary)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn keywords(&self) -> &BTreeMap<String, String> {
        &self.keywords
    }

    /// Name of the language, rendered in `locale` or in the tag itself.
    pub fn display_language(&self, locale: Option<&str>) -> String {
        self.service
            .display_language(&self.code, self.display_locale(locale))
    }

    /// Name of the region, rendered in `locale` or in the tag itself.
    pub fn display_region(&self, locale: Option<&str>) -> String {
        self.service
            .display_region(&self.code, self.display_locale(locale))
    }

    /// Name of the script, rendered in `locale` or in the tag itself.
    pub fn display_script(&self, locale: Option<&str>) -> String {
        self.service
            .display_script(&self.code, self.display_locale(locale))
    }

    fn display_locale<'s>(&'s self, locale: Option<&'s str>) -> &'s str {
        locale.filter(|l| !l.is_empty()).unwrap_or(self.code.as_str())
    }

    /// Does this tag fall under the language range `other`?
    pub fn matches<'a>(&self, other: impl Into<LanguageRef<'a>>) -> bool {
        let range = match other.into() {
            LanguageRef::Tag(tag) => tag,
            LanguageRef::Language(language) => language.code.as_str(),
        };
        self.service.filter_matches(&self.code, range, true)
    }

    /// Compare primary subtags, and scripts when both sides have one.
    ///
    /// With `spoken`, primaries are compared by their umbrella code, so
    /// `yue` equals `zh`.
    pub fn equals<'a>(&self, other: impl Into<LanguageRef<'a>>, spoken_form: bool) -> bool {
        let resolved;
        let other = match other.into() {
            LanguageRef::Language(language) => language,
            LanguageRef::Tag(tag) => {
                resolved = Language::with_service(self.service.clone(), tag);
                &resolved
            }
        };

        let script = match (self.script(), other.script()) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => true,
        };
        let primary = if spoken_form {
            self.spoken() == other.spoken()
        } else {
            self.primary == other.primary
        };
        primary && script
    }

    /// Join personal names in the order this language writes them.
    ///
    /// Chinese puts the family name first with no separator and ignores
    /// middle names. Everything else joins first, middles and last with
    /// single spaces, skipping blank parts.
    pub fn concat_names(&self, first: &str, last: &str, middles: &[&str]) -> String {
        if self.spoken() == CHINESE {
            return format!("{}{}", last.trim(), first.trim());
        }

        std::iter::once(first)
            .chain(middles.iter().copied())
            .chain(std::iter::once(last))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn spoken(primary: &str) -> &str {
    SPOKEN_PRIMARIES
        .iter()
        .find(|(dialect, _)| *dialect == primary)
        .map(|(_, umbrella)| *umbrella)
        .unwrap_or(primary)
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Language", 6)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("primary", &self.primary)?;
        state.serialize_field("script", &self.script)?;
        state.serialize_field("region", &self.region)?;
        state.serialize_field("variants", &self.variants)?;
        state.serialize_field("keywords", &self.keywords)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::DefaultLocaleService;
    use proptest::prelude::*;

    fn service() -> Arc<dyn LocaleService> {
        Arc::new(DefaultLocaleService::new("en"))
    }

    fn lang(tag: &str) -> Language {
        Language::with_service(service(), tag)
    }

    // ==================== set Tests ====================

    #[test]
    fn test_set_decomposes_subtags() {
        let language = lang("zh-cn-hans-yue");
        assert_eq!(language.code(), "zh_CN_HANS_YUE");
        assert_eq!(language.primary(), "zh");
        assert_eq!(language.script(), None);
        assert_eq!(language.region(), Some("CN"));
        assert_eq!(language.variants(), ["HANS", "YUE"]);
        assert!(language.keywords().is_empty());
    }

    #[test]
    fn test_set_script_and_region() {
        let language = lang("zh-hant-tw");
        assert_eq!(language.code(), "zh_Hant_TW");
        assert_eq!(language.script(), Some("Hant"));
        assert_eq!(language.region(), Some("TW"));
        assert!(language.variants().is_empty());
    }

    #[test]
    fn test_set_keywords() {
        let language = lang("de_DE@currency=EUR;collation=PHONE");
        assert_eq!(language.code(), "de_DE@collation=PHONE;currency=EUR");
        assert_eq!(language.keywords().len(), 2);
        assert_eq!(
            language.keywords().get("collation").map(String::as_str),
            Some("PHONE")
        );
        assert_eq!(
            language.keywords().get("currency").map(String::as_str),
            Some("EUR")
        );
    }

    #[test]
    fn test_set_replaces_stale_state() {
        let mut language = lang("zh-hans-cn-yue-goh@collation=stroke");
        language.set("en");
        assert_eq!(language.code(), "en");
        assert_eq!(language.script(), None);
        assert_eq!(language.region(), None);
        assert!(language.variants().is_empty());
        assert!(language.keywords().is_empty());
    }

    #[test]
    fn test_set_from_language_copies() {
        let source = lang("zh-hant-tw");
        let mut target = lang("en");
        target.set(&source);
        assert_eq!(target.code(), "zh_Hant_TW");

        target.set("fr");
        assert_eq!(source.code(), "zh_Hant_TW");
    }

    #[test]
    fn test_set_never_rejects() {
        let language = lang("!!not a tag!!");
        assert_eq!(language.code(), language.code().trim());
        let empty = lang("");
        assert_eq!(empty.code(), "");
        assert_eq!(empty.primary(), "");
    }

    // ==================== compose Tests ====================

    #[test]
    fn test_compose_full() {
        let language = Language::compose_with(
            service(),
            "zh",
            Some("hans"),
            Some("tw"),
            &["yue"],
            &["pvt"],
        );
        assert_eq!(language.code(), "zh_Hans_TW_YUE_X_PVT");
        assert_eq!(language.variants(), ["YUE"]);
    }

    #[test]
    fn test_compose_three_variants_without_script_or_region() {
        let language =
            Language::compose_with(service(), "zh", None, None, &["hans", "yue", "goh"], &[]);
        assert_eq!(language.code(), "zh__HANS_YUE_GOH");
        assert_eq!(language.script(), None);
        assert_eq!(language.region(), None);
        assert_eq!(language.variants(), ["HANS", "YUE", "GOH"]);
    }

    #[test]
    fn test_compose_three_variants_with_script_only() {
        let language =
            Language::compose_with(service(), "zh", Some("hans"), None, &["ab", "yue", "goh"], &[]);
        assert_eq!(language.code(), "zh_Hans__AB_YUE_GOH");
        assert_eq!(language.script(), Some("Hans"));
        assert_eq!(language.region(), None);
        assert_eq!(language.variants(), ["AB", "YUE", "GOH"]);
    }

    #[test]
    fn test_compose_three_variants_with_script_and_region() {
        let language = Language::compose_with(
            service(),
            "zh",
            Some("hant"),
            Some("tw"),
            &["hans", "ab", "yue"],
            &[],
        );
        assert_eq!(language.code(), "zh_Hant_TW_HANS_AB_YUE");
        assert_eq!(language.region(), Some("TW"));
        assert_eq!(language.variants(), ["HANS", "AB", "YUE"]);
    }

    #[test]
    fn test_compose_three_variants_with_region_only() {
        let language =
            Language::compose_with(service(), "zh", None, Some("tw"), &["hans", "ab", "yue"], &[]);
        assert_eq!(language.code(), "zh_TW_HANS_AB_YUE");
        assert_eq!(language.script(), None);
        assert_eq!(language.variants(), ["HANS", "AB", "YUE"]);
    }

    #[test]
    fn test_compose_skips_empty_parts() {
        let language = Language::compose_with(service(), "zh", Some(""), None, &[], &[]);
        assert_eq!(language.code(), "zh");
        let language = Language::compose_with(service(), "zh", None, None, &["", "yue"], &[""]);
        assert_eq!(language.code(), "zh__YUE");
        let language = Language::compose_with(service(), "en", None, Some("gb"), &[], &[]);
        assert_eq!(language.code(), "en_GB");
    }

    // ==================== Display Tests ====================

    #[test]
    fn test_display_language() {
        let language = lang("zh_CN");
        assert_eq!(language.display_language(None), "中文");
        assert_eq!(language.display_language(Some("en")), "Chinese");
        assert_eq!(language.display_language(Some("")), "中文");
    }

    #[test]
    fn test_display_region() {
        let language = lang("zh_CN");
        assert_eq!(language.display_region(None), "中国");
        assert_eq!(language.display_region(Some("en")), "China");
    }

    #[test]
    fn test_display_script() {
        let language = lang("zh_Hans");
        assert_eq!(language.display_script(None), "简体中文");
        assert_eq!(language.display_script(Some("en")), "Simplified Han");
        assert_eq!(lang("zh").display_script(None), "");
    }

    // ==================== matches / equals Tests ====================

    #[test]
    fn test_matches() {
        assert!(!lang("zh_CN").matches("zh_Hans"));
        assert!(lang("zh_Hans").matches("zh"));
        assert!(lang("zh_Hans_CN").matches(&lang("zh-hans")));
        assert!(!lang("zh").matches("zh_Hans"));
    }

    #[test]
    fn test_equals_script_only_when_both_present() {
        assert!(lang("zh").equals("zh-hans", false));
        assert!(lang("zh-hans").equals("zh-cn-hans", false));
        assert!(!lang("zh-hant").equals(&lang("zh-hans"), false));
        assert!(!lang("en").equals("zh", false));
    }

    #[test]
    fn test_equals_spoken() {
        let zh = lang("zh");
        assert!(zh.equals("yue", true));
        assert!(!zh.equals("yue", false));
        assert!(lang("cmn-hans").equals("wuu-hans", true));
        assert!(!lang("yue-hant").equals("zh-hans", true));
    }

    // ==================== spoken_primary Tests ====================

    #[test]
    fn test_spoken_primary_table() {
        for (dialect, umbrella) in SPOKEN_PRIMARIES {
            assert_eq!(
                Language::spoken_primary(Some(*dialect)),
                Some(umbrella.to_string())
            );
        }
    }

    #[test]
    fn test_spoken_primary_passthrough_and_none() {
        assert_eq!(Language::spoken_primary(Some("en")), Some("en".to_string()));
        assert_eq!(Language::spoken_primary(Some("abc")), Some("abc".to_string()));
        assert_eq!(
            Language::spoken_primary(Some(&lang("yue-hant-hk"))),
            Some("zh".to_string())
        );
        assert_eq!(Language::spoken_primary(None::<&str>), None);
    }

    #[test]
    fn test_spoken_primary_with_uses_given_service() {
        let service = service();
        assert_eq!(
            Language::spoken_primary_with(service.clone(), Some("YUE-hk")),
            Some("zh".to_string())
        );
        assert_eq!(Language::spoken_primary_with(service, None::<&str>), None);
        assert_eq!(lang("wuu").spoken(), "zh");
        assert_eq!(lang("en-gb").spoken(), "en");
    }

    // ==================== system_default / from_http_header Tests ====================

    #[test]
    fn test_system_default_with() {
        let service: Arc<dyn LocaleService> = Arc::new(DefaultLocaleService::new("de-de"));
        assert_eq!(Language::system_default_with(service).code(), "de_DE");
    }

    #[test]
    fn test_from_http_header_with() {
        let from = |header: &str| Language::from_http_header_with(service(), Some(header));
        assert_eq!(from("zh,en-gb;q=0.8,en;q=0.7").code(), "zh");
        assert_eq!(from("en-gb").code(), "en_GB");
        // regional Chinese collapses to the umbrella locale
        assert_eq!(from("zh-tw").code(), "zh");
        assert_eq!(from("zh-cn").code(), "zh");
    }

    #[test]
    fn test_from_http_header_unmatched_uses_default() {
        let service: Arc<dyn LocaleService> = Arc::new(DefaultLocaleService::new("fr-fr"));
        let language = Language::from_http_header_with(service, Some("tlh"));
        assert_eq!(language.code(), "fr_FR");
    }

    // ==================== concat_names Tests ====================

    #[test]
    fn test_concat_names_latin() {
        let language = lang("en");
        assert_eq!(
            language.concat_names(" John", "Dough ", &[" Camus ", "Vas "]),
            "John Camus Vas Dough"
        );
        assert_eq!(language.concat_names("John", "Dough", &["", "  "]), "John Dough");
        assert_eq!(language.concat_names("", "Dough", &[]), "Dough");
    }

    #[test]
    fn test_concat_names_chinese() {
        assert_eq!(lang("zh").concat_names(" 三", "张 ", &["ignored"]), "张三");
        assert_eq!(lang("yue-hant-hk").concat_names("三", "张", &[]), "张三");
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_display_trait() {
        assert_eq!(lang("zh-hant-tw").to_string(), "zh_Hant_TW");
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(lang("zh-hant-tw")).expect("Should serialize");
        assert_eq!(json["code"], "zh_Hant_TW");
        assert_eq!(json["script"], "Hant");
        assert_eq!(json["variants"], serde_json::json!([]));
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_spoken_primary_passes_through_non_dialects(primary in "[a-z]{2,3}") {
            prop_assume!(SPOKEN_PRIMARIES.iter().all(|(dialect, _)| *dialect != primary));
            prop_assert_eq!(Language::spoken_primary(Some(primary.as_str())), Some(primary.clone()));
        }

        #[test]
        fn prop_concat_names_single_spaced(
            first in " {0,2}[a-zA-Z]{0,6} {0,2}",
            last in " {0,2}[a-zA-Z]{0,6} {0,2}",
            middles in proptest::collection::vec(" {0,2}[a-zA-Z]{0,6} {0,2}", 0..4),
        ) {
            let middles: Vec<&str> = middles.iter().map(String::as_str).collect();
            let joined = lang("en").concat_names(&first, &last, &middles);
            prop_assert!(!joined.starts_with(' '));
            prop_assert!(!joined.ends_with(' '));
            prop_assert!(!joined.contains("  "));
        }

        #[test]
        fn prop_compose_keeps_variant_order(
            script in proptest::option::of("[a-z]{4}"),
            region in proptest::option::of("[a-z]{2}"),
            variants in proptest::collection::vec("[a-z]{2,8}", 3),
        ) {
            let given: Vec<&str> = variants.iter().map(String::as_str).collect();
            let language = Language::compose_with(
                service(),
                "zh",
                script.as_deref(),
                region.as_deref(),
                &given,
                &[],
            );
            let expected: Vec<String> = variants.iter().map(|v| v.to_ascii_uppercase()).collect();
            let expected_region = region.map(|r| r.to_ascii_uppercase());
            prop_assert_eq!(language.variants(), expected.as_slice());
            prop_assert_eq!(language.region(), expected_region.as_deref());
        }

        #[test]
        fn prop_set_is_idempotent(tag in "[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8}){0,4}") {
            let once = lang(&tag);
            let twice = lang(once.code());
            prop_assert_eq!(once.code(), twice.code());
            prop_assert_eq!(once.variants(), twice.variants());
        }
    }
}
