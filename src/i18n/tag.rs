//! Lenient locale ID parsing in the ICU legacy style.
//!
//! Tags are never rejected. Subtags are classified by position and shape,
//! and the canonical form is rebuilt from the classified parts, so any input
//! yields a stable (if meaningless) result.

use std::collections::BTreeMap;

/// A locale ID split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LocaleId {
    pub language: String,
    pub script: Option<String>,
    pub region: Option<String>,
    pub variants: Vec<String>,
    pub privates: Vec<String>,
    pub keywords: BTreeMap<String, String>,
}

impl LocaleId {
    pub fn parse(tag: &str) -> Self {
        let (base, keywords) = match tag.split_once('@') {
            Some((base, keywords)) => (base, parse_keywords(keywords)),
            None => (tag, BTreeMap::new()),
        };
        // POSIX ids carry a charset after '.', e.g. "en_US.UTF-8"
        let base = base.split('.').next().unwrap_or_default();

        // script and region are positional: an empty piece holds the region
        // slot open (`en__POSIX`), so the pieces after it are variants
        let mut pieces = base.split(['-', '_']).map(str::trim).peekable();

        let mut id = LocaleId {
            language: pieces.next().unwrap_or_default().to_ascii_lowercase(),
            keywords,
            ..Default::default()
        };

        if let Some(script) = pieces.next_if(|s| is_script(s)) {
            id.script = Some(title_case(script));
        }
        if let Some(region) = pieces.next_if(|s| s.is_empty() || is_region(s)) {
            if !region.is_empty() {
                id.region = Some(region.to_ascii_uppercase());
            }
        }
        let rest = pieces.filter(|s| !s.is_empty());

        let mut private = false;
        for subtag in rest {
            if !private && subtag.eq_ignore_ascii_case("x") {
                private = true;
                continue;
            }
            let subtag = subtag.to_ascii_uppercase();
            if private {
                id.privates.push(subtag);
            } else {
                id.variants.push(subtag);
            }
        }
        id
    }

    /// Underscore-separated canonical form, e.g. `zh_Hant_TW_YUE@collation=stroke`.
    pub fn to_canonical(&self) -> String {
        let mut out = self.language.clone();
        if let Some(script) = &self.script {
            out.push('_');
            out.push_str(script);
        }

        let has_tail = !self.variants.is_empty() || !self.privates.is_empty();
        if self.region.is_some() || has_tail {
            out.push('_');
            out.push_str(self.region.as_deref().unwrap_or_default());
        }
        for variant in &self.variants {
            out.push('_');
            out.push_str(variant);
        }
        if !self.privates.is_empty() {
            out.push_str("_X");
            for private in &self.privates {
                out.push('_');
                out.push_str(private);
            }
        }

        if !self.keywords.is_empty() {
            let keywords: Vec<String> = self
                .keywords
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            out.push('@');
            out.push_str(&keywords.join(";"));
        }
        out
    }

    /// Flat subtag map with numbered `variantN` and `privateN` slots.
    pub fn to_subtag_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("language".to_string(), self.language.clone());
        if let Some(script) = &self.script {
            map.insert("script".to_string(), script.clone());
        }
        if let Some(region) = &self.region {
            map.insert("region".to_string(), region.clone());
        }
        for (idx, variant) in self.variants.iter().enumerate() {
            map.insert(format!("variant{}", idx), variant.clone());
        }
        for (idx, private) in self.privates.iter().enumerate() {
            map.insert(format!("private{}", idx), private.clone());
        }
        map
    }

    /// Inverse of [`LocaleId::to_subtag_map`]; numbered slots stop at the first gap.
    pub fn from_subtag_map(subtags: &BTreeMap<String, String>) -> Self {
        let non_empty = |key: &str| subtags.get(key).filter(|v| !v.is_empty()).cloned();
        let numbered = |prefix: &str| -> Vec<String> {
            (0..)
                .map(|idx| subtags.get(&format!("{}{}", prefix, idx)))
                .take_while(Option::is_some)
                .flatten()
                .cloned()
                .collect()
        };

        let mut id = LocaleId::parse(&non_empty("language").unwrap_or_default());
        id.script = non_empty("script").map(|s| title_case(&s));
        id.region = non_empty("region").map(|s| s.to_ascii_uppercase());
        id.variants = numbered("variant")
            .iter()
            .map(|v| v.to_ascii_uppercase())
            .collect();
        id.privates = numbered("private")
            .iter()
            .map(|p| p.to_ascii_uppercase())
            .collect();
        id
    }

    /// Parent chain used for display-name fallback: `zh_Hant_TW`, `zh_Hant`, `zh`.
    pub fn fallback_chain(&self) -> Vec<String> {
        let mut base = LocaleId {
            keywords: BTreeMap::new(),
            ..self.clone()
        };
        let mut chain = vec![base.to_canonical()];
        loop {
            let truncated = base.privates.pop().is_some()
                || base.variants.pop().is_some()
                || base.region.take().is_some()
                || base.script.take().is_some();
            if !truncated {
                break;
            }
            let canonical = base.to_canonical();
            if chain.last() != Some(&canonical) {
                chain.push(canonical);
            }
        }
        chain
    }
}

fn parse_keywords(raw: &str) -> BTreeMap<String, String> {
    raw.split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_string()))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .collect()
}

fn is_script(subtag: &str) -> bool {
    subtag.len() == 4 && subtag.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_region(subtag: &str) -> bool {
    (subtag.len() == 2 && subtag.bytes().all(|b| b.is_ascii_alphabetic()))
        || (subtag.len() == 3 && subtag.bytes().all(|b| b.is_ascii_digit()))
}

fn title_case(subtag: &str) -> String {
    let lower = subtag.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
