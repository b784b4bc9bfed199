//! ISO-3166 and ISO-4217 reference data.
//!
//! Records are looked up through the narrow [`CountrySource`] and
//! [`CurrencySource`] traits. The built-in [`IsoRegistry`] takes its countries
//! from the `isocountry` crate and its currencies from a table embedded at
//! compile time; it is built once and stays immutable for the process
//! lifetime. [`RecordTable`] serves caller-supplied records.

use isocountry::CountryCode;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, error};

/// Currencies JSON embedded at compile time.
static CURRENCIES_JSON: &str = include_str!("../data/currencies.json");

/// One ISO-3166 country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// English short name (e.g., "Hong Kong")
    pub name: String,

    /// Two-letter code (e.g., "HK")
    pub alpha2: String,

    /// Three-letter code (e.g., "HKG")
    pub alpha3: String,

    /// Numeric code (e.g., 344)
    pub numeric: u16,

    /// ISO-4217 alpha-3 codes of the currencies in use, in currency-table order
    pub currencies: Vec<String>,
}

/// One ISO-4217 currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRecord {
    /// English name (e.g., "Hong Kong Dollar")
    pub name: String,

    /// Three-letter code (e.g., "HKD")
    pub alpha3: String,

    /// Numeric code (e.g., 344)
    pub numeric: u16,

    /// Minor unit exponent: digits after the decimal point
    pub exponent: u8,

    /// Alpha-2 codes of the countries using this currency, in table order
    pub countries: Vec<String>,
}

/// Country lookups by any of the three ISO-3166 identifiers.
pub trait CountrySource {
    fn country_by_alpha2(&self, code: &str) -> Option<&CountryRecord>;
    fn country_by_alpha3(&self, code: &str) -> Option<&CountryRecord>;
    fn country_by_numeric(&self, code: u16) -> Option<&CountryRecord>;
}

/// Currency lookups by alpha-3 or numeric code.
pub trait CurrencySource {
    fn currency_by_alpha3(&self, code: &str) -> Option<&CurrencyRecord>;
    fn currency_by_numeric(&self, code: u16) -> Option<&CurrencyRecord>;
}

/// Built-in reference data: `isocountry` countries plus the embedded
/// currency table.
#[derive(Debug, Clone, Default)]
pub struct IsoRegistry {
    /// Sorted by alpha-2 code
    countries: Vec<CountryRecord>,
    currencies: Vec<CurrencyRecord>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<IsoRegistry> = OnceLock::new();

impl IsoRegistry {
    /// Get the registry built from `isocountry` and the embedded currency table.
    pub fn get() -> &'static IsoRegistry {
        REGISTRY.get_or_init(|| {
            let registry = Self::with_currencies(load_table(CURRENCIES_JSON, "currencies"));
            debug!(
                "Loaded {} countries and {} currencies",
                registry.countries.len(),
                registry.currencies.len()
            );
            registry
        })
    }

    /// Build a registry over every `isocountry` country and the given
    /// currencies.
    ///
    /// Each country's currency list is derived from the currencies' member
    /// lists, so the two sides always agree.
    ///
    /// # Arguments
    /// * `currencies` - ISO-4217 records; members are alpha-2 country codes
    pub fn with_currencies(currencies: Vec<CurrencyRecord>) -> Self {
        let mut countries: Vec<CountryRecord> = CountryCode::iter()
            .filter_map(|code| country_record(*code, &currencies))
            .collect();
        countries.sort_by(|a, b| a.alpha2.cmp(&b.alpha2));

        Self {
            countries,
            currencies,
        }
    }

    /// All countries, ordered by alpha-2 code.
    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    /// All currencies, ordered by alpha-3 code.
    pub fn currencies(&self) -> &[CurrencyRecord] {
        &self.currencies
    }

    fn record(&self, code: CountryCode) -> Option<&CountryRecord> {
        self.countries
            .binary_search_by(|c| c.alpha2.as_str().cmp(code.alpha2()))
            .ok()
            .map(|idx| &self.countries[idx])
    }
}

fn country_record(code: CountryCode, currencies: &[CurrencyRecord]) -> Option<CountryRecord> {
    let numeric = match u16::try_from(code.numeric_id()) {
        Ok(numeric) => numeric,
        Err(_) => {
            error!("Country {} has out-of-range numeric code", code.alpha3());
            return None;
        }
    };

    Some(CountryRecord {
        name: code.name().to_string(),
        alpha2: code.alpha2().to_string(),
        alpha3: code.alpha3().to_string(),
        numeric,
        currencies: currencies
            .iter()
            .filter(|currency| currency.countries.iter().any(|c| c == code.alpha2()))
            .map(|currency| currency.alpha3.clone())
            .collect(),
    })
}

impl CountrySource for IsoRegistry {
    fn country_by_alpha2(&self, code: &str) -> Option<&CountryRecord> {
        CountryCode::for_alpha2_caseless(code)
            .ok()
            .and_then(|code| self.record(code))
    }

    fn country_by_alpha3(&self, code: &str) -> Option<&CountryRecord> {
        CountryCode::for_alpha3_caseless(code)
            .ok()
            .and_then(|code| self.record(code))
    }

    fn country_by_numeric(&self, code: u16) -> Option<&CountryRecord> {
        CountryCode::for_id(u32::from(code))
            .ok()
            .and_then(|code| self.record(code))
    }
}

impl CurrencySource for IsoRegistry {
    fn currency_by_alpha3(&self, code: &str) -> Option<&CurrencyRecord> {
        find_currency_by_alpha3(&self.currencies, code)
    }

    fn currency_by_numeric(&self, code: u16) -> Option<&CurrencyRecord> {
        self.currencies.iter().find(|c| c.numeric == code)
    }
}

/// Caller-supplied records, searched as given.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    countries: Vec<CountryRecord>,
    currencies: Vec<CurrencyRecord>,
}

impl RecordTable {
    /// Build a table from JSON arrays of [`CountryRecord`] and
    /// [`CurrencyRecord`].
    ///
    /// # Returns
    /// The parsed table, or the first JSON error.
    pub fn from_json(countries: &str, currencies: &str) -> serde_json::Result<Self> {
        Ok(Self {
            countries: serde_json::from_str(countries)?,
            currencies: serde_json::from_str(currencies)?,
        })
    }

    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    pub fn currencies(&self) -> &[CurrencyRecord] {
        &self.currencies
    }
}

impl CountrySource for RecordTable {
    fn country_by_alpha2(&self, code: &str) -> Option<&CountryRecord> {
        self.countries
            .iter()
            .find(|c| c.alpha2.eq_ignore_ascii_case(code))
    }

    fn country_by_alpha3(&self, code: &str) -> Option<&CountryRecord> {
        self.countries
            .iter()
            .find(|c| c.alpha3.eq_ignore_ascii_case(code))
    }

    fn country_by_numeric(&self, code: u16) -> Option<&CountryRecord> {
        self.countries.iter().find(|c| c.numeric == code)
    }
}

impl CurrencySource for RecordTable {
    fn currency_by_alpha3(&self, code: &str) -> Option<&CurrencyRecord> {
        find_currency_by_alpha3(&self.currencies, code)
    }

    fn currency_by_numeric(&self, code: u16) -> Option<&CurrencyRecord> {
        self.currencies.iter().find(|c| c.numeric == code)
    }
}

fn find_currency_by_alpha3<'a>(
    currencies: &'a [CurrencyRecord],
    code: &str,
) -> Option<&'a CurrencyRecord> {
    currencies
        .iter()
        .find(|c| c.alpha3.eq_ignore_ascii_case(code))
}

fn load_table<T: for<'de> Deserialize<'de>>(json: &str, table: &str) -> Vec<T> {
    match serde_json::from_str(json) {
        Ok(records) => records,
        Err(e) => {
            error!("Embedded {} table is invalid: {}", table, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = IsoRegistry::get();
        let registry2 = IsoRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    // ==================== Embedded Data Tests ====================

    #[test]
    fn test_embedded_currency_table_parses() {
        let currencies: Vec<CurrencyRecord> =
            serde_json::from_str(CURRENCIES_JSON).expect("currencies.json should parse");
        assert!(currencies.len() > 150);
    }

    #[test]
    fn test_registry_covers_every_iso_country() {
        let registry = IsoRegistry::get();
        assert_eq!(registry.countries().len(), CountryCode::iter().count());
        assert!(registry.countries().len() >= 249);
        assert!(registry
            .countries()
            .windows(2)
            .all(|pair| pair[0].alpha2 < pair[1].alpha2));
    }

    #[test]
    fn test_country_identifiers_are_unique() {
        let registry = IsoRegistry::get();
        let alpha2: HashSet<_> = registry.countries().iter().map(|c| &c.alpha2).collect();
        let alpha3: HashSet<_> = registry.countries().iter().map(|c| &c.alpha3).collect();
        let numeric: HashSet<_> = registry.countries().iter().map(|c| c.numeric).collect();

        assert_eq!(alpha2.len(), registry.countries().len());
        assert_eq!(alpha3.len(), registry.countries().len());
        assert_eq!(numeric.len(), registry.countries().len());
    }

    #[test]
    fn test_currency_members_are_known_countries() {
        let registry = IsoRegistry::get();
        for currency in registry.currencies() {
            for code in &currency.countries {
                assert!(
                    registry.country_by_alpha2(code).is_some(),
                    "{} lists unknown country {}",
                    currency.alpha3,
                    code
                );
            }
        }
    }

    #[test]
    fn test_country_currencies_follow_currency_members() {
        let registry = IsoRegistry::get();
        let ch = registry.country_by_alpha2("CH").expect("CH should exist");
        assert_eq!(ch.currencies, vec!["CHE", "CHF", "CHW"]);

        let aq = registry.country_by_alpha2("AQ").expect("AQ should exist");
        assert!(aq.currencies.is_empty());
    }

    #[test]
    fn test_with_currencies_links_members() {
        let registry = IsoRegistry::with_currencies(vec![CurrencyRecord {
            name: "Test Dollar".to_string(),
            alpha3: "TSD".to_string(),
            numeric: 998,
            exponent: 2,
            countries: vec!["HK".to_string(), "MO".to_string()],
        }]);

        let hk = registry.country_by_alpha3("HKG").expect("HKG should exist");
        assert_eq!(hk.currencies, vec!["TSD"]);
        assert!(registry
            .country_by_alpha2("JP")
            .is_some_and(|jp| jp.currencies.is_empty()));
        assert_eq!(registry.currencies().len(), 1);
    }

    #[test]
    fn test_country_currencies_are_known() {
        let registry = IsoRegistry::get();
        for country in registry.countries() {
            for code in &country.currencies {
                assert!(
                    registry.currency_by_alpha3(code).is_some(),
                    "{} uses unknown currency {}",
                    country.alpha2,
                    code
                );
            }
        }
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_country_lookups() {
        let registry = IsoRegistry::get();
        let hk = registry.country_by_alpha2("HK").expect("HK should exist");
        assert_eq!(hk.alpha3, "HKG");
        assert_eq!(hk.numeric, 344);
        assert_eq!(hk.currencies, vec!["HKD"]);

        assert_eq!(registry.country_by_alpha3("hkg"), Some(hk));
        assert_eq!(registry.country_by_numeric(344), Some(hk));
        assert!(registry.country_by_alpha2("YZ").is_none());
        assert!(registry.country_by_numeric(9876).is_none());
    }

    #[test]
    fn test_currency_lookups() {
        let registry = IsoRegistry::get();
        let hkd = registry.currency_by_alpha3("hkd").expect("HKD should exist");
        assert_eq!(hkd.name, "Hong Kong Dollar");
        assert_eq!(hkd.numeric, 344);
        assert_eq!(hkd.exponent, 2);
        assert_eq!(hkd.countries, vec!["HK"]);

        assert_eq!(registry.currency_by_numeric(344), Some(hkd));
        assert!(registry.currency_by_alpha3("ZYX").is_none());
    }

    #[test]
    fn test_currency_exponents() {
        let registry = IsoRegistry::get();
        let exponent = |code: &str| registry.currency_by_alpha3(code).map(|c| c.exponent);
        assert_eq!(exponent("JPY"), Some(0));
        assert_eq!(exponent("KWD"), Some(3));
        assert_eq!(exponent("CLF"), Some(4));
        assert_eq!(exponent("EUR"), Some(2));
    }

    #[test]
    fn test_record_table_from_json() {
        let registry = RecordTable::from_json(
            r#"[{"name":"Testland","alpha2":"TL","alpha3":"TST","numeric":999,"currencies":["TSD"]}]"#,
            r#"[{"name":"Test Dollar","alpha3":"TSD","numeric":998,"exponent":2,"countries":["TL"]}]"#,
        )
        .expect("Should parse");

        assert_eq!(registry.countries().len(), 1);
        assert_eq!(
            registry.country_by_numeric(999).map(|c| c.name.as_str()),
            Some("Testland")
        );
        assert_eq!(
            registry.currency_by_numeric(998).map(|c| c.alpha3.as_str()),
            Some("TSD")
        );
    }

    #[test]
    fn test_record_table_from_json_invalid() {
        assert!(RecordTable::from_json("not json", "[]").is_err());
    }
}
