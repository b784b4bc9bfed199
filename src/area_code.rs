//! International telephone area codes.
//!
//! The forward table (area code → countries) is embedded at compile time.
//! The reverse index (country → area code) is derived from it once, on first
//! use, and both stay read-only afterwards.

use crate::country::{Country, CountryRef};
use crate::error::{LocaleError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, error, warn};

/// Area codes JSON embedded at compile time.
static AREA_CODES_JSON: &str = include_str!("../data/area_codes.json");

/// One row of the area-code table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AreaCodeEntry {
    pub code: u32,

    /// Alpha-2 codes sharing this area code
    pub countries: Vec<String>,
}

struct AreaCodeTable {
    entries: Vec<AreaCodeEntry>,
    by_country: HashMap<String, u32>,
}

/// Global table instance (initialized lazily)
static TABLE: OnceLock<AreaCodeTable> = OnceLock::new();

impl AreaCodeTable {
    fn get() -> &'static AreaCodeTable {
        TABLE.get_or_init(|| {
            let entries: Vec<AreaCodeEntry> = match serde_json::from_str(AREA_CODES_JSON) {
                Ok(entries) => entries,
                Err(e) => {
                    error!("Embedded area code table is invalid: {}", e);
                    Vec::new()
                }
            };
            let by_country = reverse_index(&entries);
            debug!(
                "Built area code index: {} codes, {} countries",
                entries.len(),
                by_country.len()
            );
            AreaCodeTable {
                entries,
                by_country,
            }
        })
    }
}

/// Each country maps to exactly one area code; later duplicates are ignored.
fn reverse_index(entries: &[AreaCodeEntry]) -> HashMap<String, u32> {
    let mut index = HashMap::new();
    for entry in entries {
        for country in &entry.countries {
            if let Some(existing) = index.get(country) {
                warn!(
                    "Country {} listed under area codes {} and {}, keeping {}",
                    country, existing, entry.code, existing
                );
                continue;
            }
            index.insert(country.clone(), entry.code);
        }
    }
    index
}

/// Lookups between telephone area codes and countries.
pub struct AreaCode;

impl AreaCode {
    /// Alpha-2 codes of the countries sharing `code`, in table order.
    pub fn by_code(code: u32) -> Result<&'static [String]> {
        AreaCodeTable::get()
            .entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.countries.as_slice())
            .ok_or_else(|| LocaleError::NotFound(format!("area code {}", code)))
    }

    /// Area code of a country given by code or instance.
    ///
    /// # Errors
    /// * `InvalidCode` / `OutOfRange` if the country code does not resolve
    /// * `NotFound` if the country has no registered area code
    pub fn by_country<'a>(country: impl Into<CountryRef<'a>>) -> Result<u32> {
        let resolved;
        let country = match country.into() {
            CountryRef::Instance(country) => country,
            code => {
                resolved = Country::new(code)?;
                &resolved
            }
        };

        AreaCodeTable::get()
            .by_country
            .get(country.alpha2())
            .copied()
            .ok_or_else(|| LocaleError::NotFound(format!("area code for {}", country.alpha3())))
    }

    /// Every area code in table order.
    pub fn codes() -> impl Iterator<Item = u32> {
        AreaCodeTable::get().entries.iter().map(|entry| entry.code)
    }

    /// The full forward table.
    pub fn entries() -> &'static [AreaCodeEntry] {
        &AreaCodeTable::get().entries
    }
}
