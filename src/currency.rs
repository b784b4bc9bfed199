//! Currency value object.

use crate::code::{code_ref, CodeKind, RawCode};
use crate::country::Country;
use crate::error::{LocaleError, Result};
use crate::reference::{CurrencyRecord, CurrencySource, IsoRegistry};
use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

code_ref!(
    /// A currency argument: a raw alpha-3 or numeric code, or an existing
    /// [`Currency`].
    CurrencyRef,
    Currency
);

/// A validated snapshot of one ISO-4217 currency.
///
/// The member countries are resolved on first access to [`Currency::countries`]
/// and cached until the underlying record is replaced.
#[derive(Debug, Clone, Serialize)]
pub struct Currency {
    #[serde(flatten)]
    record: CurrencyRecord,

    #[serde(skip)]
    countries: OnceCell<Vec<Country>>,
}

impl Currency {
    /// Resolve a currency from the embedded reference data.
    ///
    /// # Arguments
    /// * `code` - An alpha-3 (`"hkd"`) or numeric (`344`, `"344"`) code, or
    ///   an existing `Currency` to copy
    ///
    /// # Errors
    /// * `InvalidCode` if an alpha-3 code is unknown (or empty)
    /// * `OutOfRange` if a numeric code is unknown
    pub fn new<'a>(code: impl Into<CurrencyRef<'a>>) -> Result<Self> {
        Self::resolve_in(IsoRegistry::get(), code)
    }

    /// Resolve a currency against an explicit data source.
    ///
    /// # Arguments
    /// * `source` - Where records are looked up
    /// * `code` - Same forms as [`Currency::new`]
    pub fn resolve_in<'a>(
        source: &dyn CurrencySource,
        code: impl Into<CurrencyRef<'a>>,
    ) -> Result<Self> {
        let record = match code.into() {
            CurrencyRef::Instance(currency) => currency.record.clone(),
            CurrencyRef::Code(raw) => {
                let record = lookup(source, raw)?;
                debug!("Resolved currency {} from {:?}", record.alpha3, raw);
                record.clone()
            }
        };
        Ok(Self {
            record,
            countries: OnceCell::new(),
        })
    }

    /// Build a currency from `map[key]`.
    ///
    /// # Returns
    /// * `Ok(None)` if the key is absent or null
    /// * `Ok(Some(Currency))` if the value resolves
    /// * `Err` if the value is present but not a known code
    pub fn from_map_entry(map: &Map<String, Value>, key: &str) -> Result<Option<Self>> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Self::new(RawCode::from_value(value)?).map(Some),
        }
    }

    /// Build a currency for every element, keeping each element's key.
    ///
    /// Objects resolve through their `"currency"` field; bare strings and
    /// integers are used as codes directly.
    pub fn map_each<'a, K>(
        items: impl IntoIterator<Item = (K, &'a Value)>,
    ) -> Result<Vec<(K, Option<Self>)>> {
        items
            .into_iter()
            .map(|(key, item)| -> Result<(K, Option<Self>)> {
                let currency = match item {
                    Value::Object(map) => Self::from_map_entry(map, "currency")?,
                    other => Some(Self::new(RawCode::from_value(other)?)?),
                };
                Ok((key, currency))
            })
            .collect()
    }

    /// Replace the underlying record and drop the cached countries.
    /// Always validates, like [`Currency::new`].
    pub fn replace<'a>(&mut self, code: impl Into<CurrencyRef<'a>>) -> Result<&mut Self> {
        *self = Self::new(code)?;
        Ok(self)
    }

    /// Replace the underlying record unless `code` is empty.
    pub fn set<'a>(&mut self, code: impl Into<CurrencyRef<'a>>) -> Result<&mut Self> {
        let code = code.into();
        if code.is_empty() {
            return Ok(self);
        }
        self.replace(code)
    }

    /// Compare alpha-3 codes. Raw codes are resolved first, so an invalid
    /// code is an error rather than `false`.
    pub fn equals<'a>(&self, other: impl Into<CurrencyRef<'a>>) -> Result<bool> {
        match other.into() {
            CurrencyRef::Instance(currency) => Ok(self == currency),
            code => Ok(*self == Self::new(code)?),
        }
    }

    /// Three-letter code (e.g., "HKD").
    pub fn alpha3(&self) -> &str {
        &self.record.alpha3
    }

    /// ISO-4217 numeric code (e.g., 344).
    pub fn numeric(&self) -> u16 {
        self.record.numeric
    }

    /// English name
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Digits used by the minor unit.
    pub fn decimals(&self) -> u8 {
        self.record.exponent
    }

    /// Alpha-2 codes of the countries using this currency.
    pub fn country_codes(&self) -> &[String] {
        &self.record.countries
    }

    /// Countries using this currency, resolved once and cached.
    ///
    /// # Returns
    /// * `Ok(&[])` for currencies without members (e.g., `XAU`)
    /// * `Err` if a member code no longer resolves
    pub fn countries(&self) -> Result<&[Country]> {
        if let Some(countries) = self.countries.get() {
            return Ok(countries);
        }

        let resolved = self
            .record
            .countries
            .iter()
            .map(Country::new)
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "Resolved {} countries for currency {}",
            resolved.len(),
            self.record.alpha3
        );

        Ok(self.countries.get_or_init(|| resolved))
    }

    /// The underlying reference record.
    pub fn record(&self) -> &CurrencyRecord {
        &self.record
    }
}

fn lookup<'s>(source: &'s dyn CurrencySource, raw: RawCode<'_>) -> Result<&'s CurrencyRecord> {
    match raw.classify()? {
        CodeKind::Numeric(code) => source
            .currency_by_numeric(code)
            .ok_or_else(|| LocaleError::OutOfRange(code.to_string())),
        CodeKind::Alpha2(code) | CodeKind::Alpha3(code) => source
            .currency_by_alpha3(code)
            .ok_or_else(|| LocaleError::InvalidCode(code.to_string())),
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.record.alpha3 == other.record.alpha3
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.record.alpha3.hash(state);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.record.alpha3)
    }
}
