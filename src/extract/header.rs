//! Section headers inside multi-item posts.
//!
//! Dealers group stock under lines such as `2024 all brand new`,
//! `🔥 AP used`, `Audemars Piguet (Preowned)` or a bare `New`. Such a line
//! carries no reference number of its own; its year, condition and brand
//! apply to every following item until the next header replaces them.

use std::sync::LazyLock;

use regex::Regex;

use super::fields::extract_pid;

/// Values a header supplies to the items under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderContext {
    pub year: Option<String>,
    pub condition: Option<String>,
    pub brand: Option<String>,
}

/// Which header shape matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderShape {
    /// `🔥 AP used`, `1. PP new`
    BrandCode,
    /// `2024 all brand new`
    YearCondition,
    /// `Audemars Piguet (Preowned)`
    BrandCondition,
    /// `New`
    ConditionOnly,
}

const CONDITION_WORDS: &str = r"brand\s*new|like\s*new|new|used|pre-?\s*owned|unworn";

static RE_BRAND_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*(?:\d{{1,2}}[^\p{{L}}\p{{N}}\s]*|[^\p{{L}}\p{{N}}\s]+)\s*(AP|PP|VC|RLX|RM)\b\s*[-:]?\s*({CONDITION_WORDS})\b"
    ))
    .unwrap()
});

static RE_YEAR_CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b((?:19|20)\d{{2}})\b.*?\b({CONDITION_WORDS})\b"
    ))
    .unwrap()
});

static RE_BRAND_CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^[^\p{{L}}\p{{N}}]*(\p{{L}}[\p{{L}} .&'-]{{0,40}}?)\s*[(\[]\s*({CONDITION_WORDS})\s*[)\]]\s*:?[^\p{{L}}\p{{N}}]*$"
    ))
    .unwrap()
});

static RE_CONDITION_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^[^\p{{L}}\p{{N}}]*({CONDITION_WORDS})\s*:?[^\p{{L}}\p{{N}}]*$"
    ))
    .unwrap()
});

/// Maps header condition wording to a canonical label.
fn canonical_condition(word: &str) -> String {
    let lowered = word.to_lowercase();
    let compact: String = lowered.chars().filter(|c| c.is_alphanumeric()).collect();
    match compact.as_str() {
        "new" | "brandnew" => "Brand New",
        "likenew" => "Like New",
        "unworn" => "Unworn",
        _ => "Used",
    }
    .to_string()
}

/// Expands dealer brand shorthand.
fn canonical_brand(raw: &str) -> String {
    match raw.trim().to_uppercase().as_str() {
        "AP" => "Audemars Piguet".to_string(),
        "PP" => "Patek Philippe".to_string(),
        "VC" => "Vacheron Constantin".to_string(),
        "RLX" => "Rolex".to_string(),
        "RM" => "Richard Mille".to_string(),
        _ => raw.trim().to_string(),
    }
}

/// Recognizes a header line. Lines carrying a reference number are items,
/// never headers.
///
/// # Example
///
/// ```rust
/// use watchpack::extract::{detect_header, HeaderShape};
///
/// let (shape, ctx) = detect_header("2024 all brand new").unwrap();
/// assert_eq!(shape, HeaderShape::YearCondition);
/// assert_eq!(ctx.year.as_deref(), Some("2024"));
/// assert_eq!(ctx.condition.as_deref(), Some("Brand New"));
/// ```
pub fn detect_header(line: &str) -> Option<(HeaderShape, HeaderContext)> {
    let line = line.trim();
    if line.is_empty() || extract_pid(line).is_some() {
        return None;
    }

    if let Some(caps) = RE_BRAND_CODE.captures(line) {
        return Some((
            HeaderShape::BrandCode,
            HeaderContext {
                year: None,
                condition: Some(canonical_condition(&caps[2])),
                brand: Some(canonical_brand(&caps[1])),
            },
        ));
    }
    if let Some(caps) = RE_YEAR_CONDITION.captures(line) {
        return Some((
            HeaderShape::YearCondition,
            HeaderContext {
                year: Some(caps[1].to_string()),
                condition: Some(canonical_condition(&caps[2])),
                brand: None,
            },
        ));
    }
    if let Some(caps) = RE_BRAND_CONDITION.captures(line) {
        return Some((
            HeaderShape::BrandCondition,
            HeaderContext {
                year: None,
                condition: Some(canonical_condition(&caps[2])),
                brand: Some(canonical_brand(&caps[1])),
            },
        ));
    }
    if let Some(caps) = RE_CONDITION_ONLY.captures(line) {
        return Some((
            HeaderShape::ConditionOnly,
            HeaderContext {
                year: None,
                condition: Some(canonical_condition(&caps[1])),
                brand: None,
            },
        ));
    }
    None
}

/// Returns the header context in force at each line.
///
/// A new header replaces the previous context wholesale; fields it does
/// not name are cleared rather than inherited.
pub fn header_contexts<'a, I>(lines: I) -> Vec<Option<HeaderContext>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut current: Option<HeaderContext> = None;
    lines
        .into_iter()
        .map(|line| {
            if let Some((shape, ctx)) = detect_header(line) {
                tracing::trace!(?shape, line, "header");
                current = Some(ctx);
            }
            current.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_condition_header() {
        let (shape, ctx) = detect_header("2024 all brand new").unwrap();
        assert_eq!(shape, HeaderShape::YearCondition);
        assert_eq!(ctx.year.as_deref(), Some("2024"));
        assert_eq!(ctx.condition.as_deref(), Some("Brand New"));
        assert!(ctx.brand.is_none());
    }

    #[test]
    fn test_brand_code_header() {
        let (shape, ctx) = detect_header("🔥 AP used").unwrap();
        assert_eq!(shape, HeaderShape::BrandCode);
        assert_eq!(ctx.brand.as_deref(), Some("Audemars Piguet"));
        assert_eq!(ctx.condition.as_deref(), Some("Used"));

        let (_, ctx) = detect_header("1. PP new").unwrap();
        assert_eq!(ctx.brand.as_deref(), Some("Patek Philippe"));
        assert_eq!(ctx.condition.as_deref(), Some("Brand New"));
    }

    #[test]
    fn test_brand_condition_header() {
        let (shape, ctx) = detect_header("Audemars Piguet (Preowned)").unwrap();
        assert_eq!(shape, HeaderShape::BrandCondition);
        assert_eq!(ctx.brand.as_deref(), Some("Audemars Piguet"));
        assert_eq!(ctx.condition.as_deref(), Some("Used"));
    }

    #[test]
    fn test_condition_only_header() {
        let (shape, ctx) = detect_header("New").unwrap();
        assert_eq!(shape, HeaderShape::ConditionOnly);
        assert_eq!(ctx.condition.as_deref(), Some("Brand New"));

        let (_, ctx) = detect_header("*Unworn:*").unwrap();
        assert_eq!(ctx.condition.as_deref(), Some("Unworn"));
    }

    #[test]
    fn test_item_line_is_not_header() {
        assert!(detect_header("126610LN 2024 new 135k").is_none());
        assert!(detect_header("5711/1A used").is_none());
        assert!(detect_header("").is_none());
        assert!(detect_header("Good morning everyone").is_none());
    }

    #[test]
    fn test_header_contexts_replace_wholesale() {
        let lines = [
            "2024 all brand new",
            "126610LN 135k",
            "AP (used)",
            "15500ST 300k",
        ];
        let contexts = header_contexts(lines);

        assert_eq!(contexts[1].as_ref().unwrap().year.as_deref(), Some("2024"));
        let last = contexts[3].as_ref().unwrap();
        assert_eq!(last.condition.as_deref(), Some("Used"));
        assert_eq!(last.brand.as_deref(), Some("Audemars Piguet"));
        assert!(last.year.is_none());
    }

    #[test]
    fn test_header_contexts_none_before_first_header() {
        let contexts = header_contexts(["5711/1A 185k", "New", "126610LN 135k"]);
        assert!(contexts[0].is_none());
        assert_eq!(contexts[2].as_ref().unwrap().condition.as_deref(), Some("Brand New"));
    }
}
