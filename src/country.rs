//! Country value object.

use crate::area_code::AreaCode;
use crate::code::{code_ref, CodeKind, RawCode};
use crate::error::{LocaleError, Result};
use crate::i18n::{default_service, LocaleService};
use crate::reference::{CountryRecord, CountrySource, IsoRegistry};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

code_ref!(
    /// A country argument: a raw alpha-2, alpha-3 or numeric code, or an
    /// existing [`Country`].
    CountryRef,
    Country
);

/// A validated snapshot of one ISO-3166 country.
///
/// Cloning copies the underlying record; two instances never share state.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Country {
    record: CountryRecord,
}

impl Country {
    /// Resolve a country from the built-in reference data.
    ///
    /// # Arguments
    /// * `code` - An alpha-2 (`"HK"`), alpha-3 (`"hkg"`) or numeric (`344`)
    ///   code, or an existing `Country` to copy
    ///
    /// # Errors
    /// * `InvalidCode` if an alpha-2 or alpha-3 code is unknown (or empty)
    /// * `OutOfRange` if a numeric code is unknown
    pub fn new<'a>(code: impl Into<CountryRef<'a>>) -> Result<Self> {
        Self::resolve_in(IsoRegistry::get(), code)
    }

    /// Resolve a country against an explicit data source.
    ///
    /// # Arguments
    /// * `source` - Where records are looked up (e.g., a [`RecordTable`](crate::RecordTable))
    /// * `code` - Same forms as [`Country::new`]
    pub fn resolve_in<'a>(
        source: &dyn CountrySource,
        code: impl Into<CountryRef<'a>>,
    ) -> Result<Self> {
        match code.into() {
            CountryRef::Instance(country) => Ok(country.clone()),
            CountryRef::Code(raw) => {
                let record = lookup(source, raw)?;
                debug!("Resolved country {} from {:?}", record.alpha3, raw);
                Ok(Self {
                    record: record.clone(),
                })
            }
        }
    }

    /// Build a country from `map[key]`.
    ///
    /// # Returns
    /// * `Ok(None)` if the key is absent or null
    /// * `Ok(Some(Country))` if the value resolves
    /// * `Err` if the value is present but not a known code
    pub fn from_map_entry(map: &Map<String, Value>, key: &str) -> Result<Option<Self>> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Self::new(RawCode::from_value(value)?).map(Some),
        }
    }

    /// Build a country for every element, keeping each element's key.
    ///
    /// Objects resolve through their `"country"` field; bare strings and
    /// integers are used as codes directly.
    pub fn map_each<'a, K>(
        items: impl IntoIterator<Item = (K, &'a Value)>,
    ) -> Result<Vec<(K, Option<Self>)>> {
        items
            .into_iter()
            .map(|(key, item)| -> Result<(K, Option<Self>)> {
                let country = match item {
                    Value::Object(map) => Self::from_map_entry(map, "country")?,
                    other => Some(Self::new(RawCode::from_value(other)?)?),
                };
                Ok((key, country))
            })
            .collect()
    }

    /// Replace the underlying record. Always validates, like [`Country::new`].
    pub fn replace<'a>(&mut self, code: impl Into<CountryRef<'a>>) -> Result<&mut Self> {
        *self = Self::new(code)?;
        Ok(self)
    }

    /// Replace the underlying record unless `code` is empty.
    ///
    /// Empty or whitespace-only codes leave `self` untouched; anything else
    /// is validated exactly as in [`Country::replace`].
    pub fn set<'a>(&mut self, code: impl Into<CountryRef<'a>>) -> Result<&mut Self> {
        let code = code.into();
        if code.is_empty() {
            return Ok(self);
        }
        self.replace(code)
    }

    /// Compare alpha-3 codes. Raw codes are resolved first, so an invalid
    /// code is an error rather than `false`.
    pub fn equals<'a>(&self, other: impl Into<CountryRef<'a>>) -> Result<bool> {
        match other.into() {
            CountryRef::Instance(country) => Ok(self == country),
            code => Ok(*self == Self::new(code)?),
        }
    }

    /// English name, or the region's display name in `locale`.
    ///
    /// # Arguments
    /// * `locale` - Display locale (e.g., `"zh"`); `None` or `""` selects the
    ///   ISO English short name
    ///
    /// # Returns
    /// The localized name, or the region code when no table knows it.
    pub fn name(&self, locale: Option<&str>) -> String {
        self.name_with(default_service().as_ref(), locale)
    }

    /// Same as [`Country::name`] with an explicit locale service.
    pub fn name_with(&self, service: &dyn LocaleService, locale: Option<&str>) -> String {
        match locale.filter(|l| !l.is_empty()) {
            None => self.record.name.clone(),
            Some(locale) => {
                service.display_region(&format!("en-{}", self.record.alpha2), locale)
            }
        }
    }

    /// Two-letter code (e.g., "HK").
    pub fn alpha2(&self) -> &str {
        &self.record.alpha2
    }

    /// Three-letter code (e.g., "HKG").
    pub fn alpha3(&self) -> &str {
        &self.record.alpha3
    }

    /// ISO-3166 numeric code (e.g., 344).
    pub fn numeric(&self) -> u16 {
        self.record.numeric
    }

    /// Alpha-3 codes of the official currencies.
    pub fn currencies(&self) -> &[String] {
        &self.record.currencies
    }

    /// Telephone area code.
    ///
    /// # Errors
    /// * `NotFound` if the country has no calling code (e.g., `BV`)
    pub fn area_code(&self) -> Result<u32> {
        AreaCode::by_country(self)
    }

    /// The underlying reference record.
    pub fn record(&self) -> &CountryRecord {
        &self.record
    }
}

fn lookup<'s>(source: &'s dyn CountrySource, raw: RawCode<'_>) -> Result<&'s CountryRecord> {
    match raw.classify()? {
        CodeKind::Numeric(code) => source
            .country_by_numeric(code)
            .ok_or_else(|| LocaleError::OutOfRange(code.to_string())),
        CodeKind::Alpha2(code) => source
            .country_by_alpha2(code)
            .ok_or_else(|| LocaleError::InvalidCode(code.to_string())),
        CodeKind::Alpha3(code) => source
            .country_by_alpha3(code)
            .ok_or_else(|| LocaleError::InvalidCode(code.to_string())),
    }
}

impl PartialEq for Country {
    fn eq(&self, other: &Self) -> bool {
        self.record.alpha3 == other.record.alpha3
    }
}

impl Eq for Country {}

impl Hash for Country {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.record.alpha3.hash(state);
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.record.alpha3)
    }
}
