//! Internationalization (i18n) module: language tags and locale data.
//!
//! # Architecture
//!
//! - `service`: The [`LocaleService`] seam and its embedded-data implementation
//! - `language`: The [`Language`] value object built on top of the service
//! - `registry`: Localized display names and negotiable locales
//! - `tag`: Lenient locale ID parsing and canonicalization
//! - `accept`: HTTP Accept-Language negotiation
//!
//! # Example
//!
//! ```rust
//! use locale_kit::i18n::Language;
//!
//! let language = Language::new("zh-hant-tw");
//! assert_eq!(language.code(), "zh_Hant_TW");
//! assert_eq!(language.display_region(Some("en")), "Taiwan");
//! assert_eq!(language.concat_names("三", "张", &[]), "张三");
//! ```

mod accept;
mod language;
mod registry;
mod service;
mod tag;

pub use language::{Language, LanguageRef, SPOKEN_PRIMARIES};
pub use registry::{DisplayNameRegistry, DisplayNames, NameKind};
pub use service::{default_service, DefaultLocaleService, LocaleService};
