//! Raw code arguments shared by the country and currency lookups.
//!
//! Every operation that accepts "a code or an existing instance" takes one of
//! the small sum types defined with [`code_ref!`]; this module holds the raw
//! side of those types and the rule that classifies a raw code.

use crate::error::{LocaleError, Result};
use serde_json::Value;

/// A code supplied by the caller before it has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawCode<'a> {
    Text(&'a str),
    Numeric(i64),
}

/// How a raw code is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CodeKind<'a> {
    Numeric(u16),
    Alpha2(&'a str),
    Alpha3(&'a str),
}

impl<'a> RawCode<'a> {
    /// Blank text counts as "no code" for tolerant updates.
    pub fn is_empty(&self) -> bool {
        matches!(self, RawCode::Text(text) if text.trim().is_empty())
    }

    /// Numeric values (or all-digit text) are numeric codes, two-character
    /// text is alpha-2, anything else is alpha-3.
    pub(crate) fn classify(&self) -> Result<CodeKind<'a>> {
        match *self {
            RawCode::Numeric(value) => numeric_kind(value, &value.to_string()),
            RawCode::Text(text) => {
                let text = text.trim();
                if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                    let value = text
                        .parse::<i64>()
                        .map_err(|_| LocaleError::OutOfRange(text.to_string()))?;
                    numeric_kind(value, text)
                } else if text.chars().count() == 2 {
                    Ok(CodeKind::Alpha2(text))
                } else {
                    Ok(CodeKind::Alpha3(text))
                }
            }
        }
    }

    /// Read a code out of a JSON field: strings and integers are accepted.
    pub fn from_value(value: &'a Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(RawCode::Text(text)),
            Value::Number(number) => number
                .as_i64()
                .map(RawCode::Numeric)
                .ok_or_else(|| LocaleError::OutOfRange(number.to_string())),
            other => Err(LocaleError::InvalidCode(other.to_string())),
        }
    }
}

fn numeric_kind<'a>(value: i64, raw: &str) -> Result<CodeKind<'a>> {
    u16::try_from(value)
        .map(CodeKind::Numeric)
        .map_err(|_| LocaleError::OutOfRange(raw.to_string()))
}

impl<'a> From<&'a str> for RawCode<'a> {
    fn from(code: &'a str) -> Self {
        RawCode::Text(code)
    }
}

impl<'a> From<&'a String> for RawCode<'a> {
    fn from(code: &'a String) -> Self {
        RawCode::Text(code.as_str())
    }
}

impl From<i64> for RawCode<'_> {
    fn from(code: i64) -> Self {
        RawCode::Numeric(code)
    }
}

impl From<i32> for RawCode<'_> {
    fn from(code: i32) -> Self {
        RawCode::Numeric(i64::from(code))
    }
}

impl From<u32> for RawCode<'_> {
    fn from(code: u32) -> Self {
        RawCode::Numeric(i64::from(code))
    }
}

impl From<u16> for RawCode<'_> {
    fn from(code: u16) -> Self {
        RawCode::Numeric(i64::from(code))
    }
}

/// Declares a `{Code, Instance}` argument type for a value object.
///
/// Absent input (`None`) converts to blank text, so tolerant updates treat it
/// as "no change" and strict constructors reject it.
macro_rules! code_ref {
    ($(#[$meta:meta])* $name:ident, $target:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub enum $name<'a> {
            Code($crate::code::RawCode<'a>),
            Instance(&'a $target),
        }

        impl $name<'_> {
            pub fn is_empty(&self) -> bool {
                matches!(self, $name::Code(code) if code.is_empty())
            }
        }

        impl<'a> From<&'a $target> for $name<'a> {
            fn from(instance: &'a $target) -> Self {
                $name::Instance(instance)
            }
        }

        impl<'a> From<$crate::code::RawCode<'a>> for $name<'a> {
            fn from(code: $crate::code::RawCode<'a>) -> Self {
                $name::Code(code)
            }
        }

        impl<'a> From<&'a str> for $name<'a> {
            fn from(code: &'a str) -> Self {
                $name::Code(code.into())
            }
        }

        impl<'a> From<&'a String> for $name<'a> {
            fn from(code: &'a String) -> Self {
                $name::Code(code.into())
            }
        }

        impl<'a> From<Option<&'a str>> for $name<'a> {
            fn from(code: Option<&'a str>) -> Self {
                $name::Code(code.unwrap_or_default().into())
            }
        }

        impl From<i64> for $name<'_> {
            fn from(code: i64) -> Self {
                $name::Code(code.into())
            }
        }

        impl From<i32> for $name<'_> {
            fn from(code: i32) -> Self {
                $name::Code(code.into())
            }
        }

        impl From<u32> for $name<'_> {
            fn from(code: u32) -> Self {
                $name::Code(code.into())
            }
        }

        impl From<u16> for $name<'_> {
            fn from(code: u16) -> Self {
                $name::Code(code.into())
            }
        }
    };
}

pub(crate) use code_ref;
