//! Country, currency, telephone area-code and language-tag value objects over
//! ISO-3166, ISO-4217 and CLDR-derived reference data.
//!
//! ```rust
//! use locale_kit::{AreaCode, Country, Currency};
//!
//! let hk = Country::new("HK")?;
//! assert_eq!(hk.alpha3(), "HKG");
//! assert_eq!(AreaCode::by_country(&hk)?, 852);
//!
//! let hkd = Currency::new(344)?;
//! assert_eq!(hkd.decimals(), 2);
//! # Ok::<(), locale_kit::LocaleError>(())
//! ```

pub mod area_code;
pub mod code;
pub mod config;
pub mod country;
pub mod currency;
pub mod error;
pub mod i18n;
pub mod reference;

pub use area_code::{AreaCode, AreaCodeEntry};
pub use code::RawCode;
pub use config::Config;
pub use country::{Country, CountryRef};
pub use currency::{Currency, CurrencyRef};
pub use error::{LocaleError, Result};
pub use i18n::{Language, LanguageRef, LocaleService};
pub use reference::{
    CountryRecord, CountrySource, CurrencyRecord, CurrencySource, IsoRegistry, RecordTable,
};
