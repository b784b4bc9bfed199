//! HTTP Accept-Language negotiation against the available display locales.
//!
//! Matching follows ICU's `acceptLanguage`: a first pass looks for an exact
//! match over every range in quality order, and only then does a second pass
//! truncate each range subtag by subtag. `zh-tw` therefore lands on `zh`,
//! because only script-qualified Chinese regional locales are available.

use crate::i18n::tag::LocaleId;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

static ENTRY_REGEX: OnceLock<Regex> = OnceLock::new();

/// One weighted language range from the header.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WeightedRange {
    pub range: String,
    pub quality: f32,
}

/// Parse a header into ranges ordered by descending quality.
///
/// Malformed entries, `*` and `q=0` ranges are dropped. Ties keep header order.
pub(crate) fn parse_header(header: &str) -> Vec<WeightedRange> {
    let regex = ENTRY_REGEX.get_or_init(|| {
        Regex::new(
            r"^\s*([A-Za-z]{1,8}(?:[-_][A-Za-z0-9]{1,8})*|\*)\s*(?:;\s*[qQ]\s*=\s*([0-9](?:\.[0-9]{0,3})?))?\s*$",
        )
        .unwrap()
    });

    let mut ranges: Vec<WeightedRange> = header
        .split(',')
        .filter_map(|entry| regex.captures(entry))
        .filter_map(|caps| {
            let range = caps.get(1)?.as_str();
            let quality = match caps.get(2) {
                Some(q) => q.as_str().parse::<f32>().ok()?.min(1.0),
                None => 1.0,
            };
            (range != "*" && quality > 0.0).then(|| WeightedRange {
                range: range.to_string(),
                quality,
            })
        })
        .collect();

    // stable: equal weights keep their header order
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}

/// Pick the best available locale for `header`.
pub(crate) fn negotiate<'a>(header: &str, available: &'a [String]) -> Option<&'a str> {
    let candidates: Vec<LocaleId> = parse_header(header)
        .iter()
        .map(|weighted| LocaleId::parse(&weighted.range))
        .collect();

    let find = |locale: &str| {
        available
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(locale))
            .map(String::as_str)
    };

    let exact = candidates
        .iter()
        .find_map(|candidate| find(candidate.to_canonical().as_str()));
    if exact.is_some() {
        return exact;
    }

    let fallback = candidates.iter().find_map(|candidate| {
        candidate
            .fallback_chain()
            .iter()
            .skip(1)
            .find_map(|parent| find(parent.as_str()))
    });
    if let Some(locale) = fallback {
        debug!("Accept-Language '{}' negotiated by truncation to {}", header, locale);
    }
    fallback
}
