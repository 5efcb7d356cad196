//! Per-segment field extractors: reference number (PID), year, condition,
//! variant and month code.
//!
//! PID recognition is an ordered cascade of [`PidMatcher`]s. Each matcher
//! scans the text left to right and the first candidate that survives
//! [`is_rejected_pid`] wins; otherwise the next matcher is tried. The other
//! extractors work on the segment text with the PID span blanked out, so a
//! reference like `5711/1A` never leaks into the year or month fields.

use std::sync::LazyLock;

use regex::Regex;

/// A reference number found in text, with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidMatch {
    /// Normalized value: upper-cased, whitespace removed.
    pub value: String,
    pub start: usize,
    pub end: usize,
    /// Name of the matcher that produced it.
    pub matcher: &'static str,
}

/// One step of a PID cascade.
pub struct PidMatcher {
    pub name: &'static str,
    regex: Regex,
}

impl PidMatcher {
    pub fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }

    /// Returns every non-rejected candidate in the text, left to right.
    pub fn candidates<'a>(&'a self, text: &'a str) -> impl Iterator<Item = PidMatch> + 'a {
        self.regex.captures_iter(text).filter_map(move |caps| {
            let m = caps.get(1)?;
            let value = normalize_pid(m.as_str());
            if is_rejected_pid(&value) || is_unit_adjacent(text, m.start(), m.end()) {
                return None;
            }
            Some(PidMatch {
                value,
                start: m.start(),
                end: m.end(),
                matcher: self.name,
            })
        })
    }
}

/// Cascade used on selling posts, most specific shape first.
pub static SELLING_CASCADE: LazyLock<Vec<PidMatcher>> = LazyLock::new(|| {
    vec![
        PidMatcher::new(
            "dealer_composite",
            r"(?i)\b(\d{5}[A-Z]{2}\.[A-Z]{2}\.[A-Z0-9]{4,8}\.\d{2}|\d{4}V/\d{3}[A-Z]-[A-Z0-9]{4}|\d{4,5}(?:/\d{1,4})?[A-Z]{1,4}-\d{3,4})\b",
        ),
        PidMatcher::new(
            "brand_format",
            r"(?i)\b(RM\s?-?\d{2,3}(?:-\d{2})?|\d{4}/\d{1,4}[A-Z]{1,4}|\d{4,6}[A-Z]{1,6}|W[A-Z]{3}\d{4})\b",
        ),
        PidMatcher::new(
            "generic",
            r"(?i)\b([A-Z0-9]*\d[A-Z0-9]*(?:[-/.][A-Z0-9]+){1,5})\b",
        ),
        PidMatcher::new("bare_digits", r"\b(\d{5,6})\b"),
    ]
});

/// Words that can look like codes in sloppy text but never are.
const PID_DENYLIST: &[&str] = &[
    "BLUE",
    "BLACK",
    "GREEN",
    "WHITE",
    "RED",
    "GREY",
    "GRAY",
    "SECOND-HAND",
    "2ND-HAND",
    "PRE-OWNED",
    "FULL-SET",
    "CONFIRM",
    "CONFIRMED",
    "N/A",
    "B/P",
];

const UNIT_SUFFIXES: &[&str] = &["HKD", "USDT", "USD", "EUR", "CHF", "GBP", "K", "M", "MM"];

static RE_YEAR_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:19|20)\d{2}(?:Y|YR|YRS)?$").unwrap());

static RE_DATE_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\d{1,2}[/.-]\d{1,2}(?:[/.-]\d{2,4})?|\d{1,2}/\d{4}|\d{4}[/.-]\d{1,2}(?:[/.-]\d{1,2})?)$",
    )
    .unwrap()
});

static RE_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?(?:K|M|MIL|MILL)?$").unwrap());

static RE_TRAILING_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+([A-Z]+)$").unwrap());

static RE_CURRENCY_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:hkd|usdt|usd|eur|chf|gbp|[$€£])\s*[:=]?\s*$").unwrap());

static RE_UNIT_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:k|m|mil|mill|million|hkd|usdt|usd|eur|chf|gbp)\b").unwrap()
});

/// Upper-cases a reference and strips whitespace.
pub fn normalize_pid(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Returns `true` for candidates that are dates, years, amounts or words.
pub fn is_rejected_pid(candidate: &str) -> bool {
    if candidate.is_empty() || PID_DENYLIST.contains(&candidate) {
        return true;
    }
    if RE_YEAR_ONLY.is_match(candidate) || RE_DATE_LIKE.is_match(candidate) {
        return true;
    }
    if RE_AMOUNT.is_match(candidate) && !candidate.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if let Some(caps) = RE_TRAILING_LETTERS.captures(candidate) {
        if UNIT_SUFFIXES.contains(&&caps[1]) {
            return true;
        }
    }
    // digits and separators only, too short to be a reference
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    candidate.chars().all(|c| !c.is_alphabetic()) && digits < 5
}

/// Bare numbers next to a currency or unit are prices, not references.
fn is_unit_adjacent(text: &str, start: usize, end: usize) -> bool {
    let span = &text[start..end];
    if !span.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    RE_CURRENCY_BEFORE.is_match(&text[..start]) || RE_UNIT_AFTER.is_match(&text[end..])
}

/// Runs a cascade and returns the first surviving candidate.
pub fn extract_pid_with(cascade: &[PidMatcher], text: &str) -> Option<PidMatch> {
    cascade
        .iter()
        .find_map(|matcher| matcher.candidates(text).next())
}

/// Extracts the reference number of a selling segment.
///
/// # Example
///
/// ```rust
/// use watchpack::extract::extract_pid;
///
/// let pid = extract_pid("🍁5267/200A Champ 05/2025 New 798000HKD").unwrap();
/// assert_eq!(pid.value, "5267/200A");
/// assert!(extract_pid("2024 all brand new").is_none());
/// ```
pub fn extract_pid(text: &str) -> Option<PidMatch> {
    extract_pid_with(&SELLING_CASCADE, text)
}

/// Collects every non-overlapping candidate of a cascade. Earlier matchers
/// claim their spans first; the result is ordered by position.
pub fn extract_all_pids(cascade: &[PidMatcher], text: &str) -> Vec<PidMatch> {
    let mut found: Vec<PidMatch> = Vec::new();
    for matcher in cascade {
        for candidate in matcher.candidates(text) {
            let overlaps = found
                .iter()
                .any(|f| candidate.start < f.end && f.start < candidate.end);
            if !overlaps {
                found.push(candidate);
            }
        }
    }
    found.sort_by_key(|m| m.start);
    found
}

/// Returns the text with the byte range blanked out by a single space.
pub fn blank_span(text: &str, start: usize, end: usize) -> String {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push(' ');
    out.push_str(&text[end..]);
    out
}

// ============================================================================
// Year
// ============================================================================

static RE_YEAR_FULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b((?:19|20)\d{2})\s*(?:y|yr|yrs|year)?\b").unwrap()
});

static RE_YEAR_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{2})\s*(?:y|yr|yrs)\b").unwrap());

/// Extracts a four-digit year. `24y` expands to `2024`, `98y` to `1998`.
pub fn extract_year(text: &str) -> Option<String> {
    if let Some(caps) = RE_YEAR_FULL.captures(text) {
        return Some(caps[1].to_string());
    }
    let caps = RE_YEAR_SHORT.captures(text)?;
    let short: u32 = caps[1].parse().ok()?;
    let century = if short < 50 { 2000 } else { 1900 };
    Some((century + short).to_string())
}

// ============================================================================
// Condition
// ============================================================================

struct ConditionRule {
    label: &'static str,
    regex: Regex,
    /// Test against the text with "like new" removed.
    ignores_like_new: bool,
}

impl ConditionRule {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            regex: Regex::new(pattern).unwrap(),
            ignores_like_new: false,
        }
    }
}

static CONDITION_LADDER: LazyLock<Vec<ConditionRule>> = LazyLock::new(|| {
    vec![
        ConditionRule::new(
            "Brand New In Box",
            r"\bbnib\b|\bbrand\s*new\s*in\s*box\b|\bnew\s*in\s*box\b",
        ),
        ConditionRule::new("Like New In Box", r"\blnib\b|\blike\s*new\s*in\s*box\b"),
        ConditionRule {
            ignores_like_new: true,
            ..ConditionRule::new("Brand New", r"\bbrand\s*new\b|\bbnew\b|\bnew\b")
        },
        ConditionRule::new("Unworn", r"\bun-?worn\b|\bnos\b"),
        ConditionRule::new("Like New", r"\blike\s*new\b|\blikenew\b"),
        ConditionRule::new("Full Set", r"\bfull\s*-?\s*set\b|\bfull\s*box\b"),
        ConditionRule::new("Only Watch", r"\bonly\s*watch\b|\bwatch\s*only\b|\bnaked\b"),
        ConditionRule::new("Mint", r"\bmint\b"),
        ConditionRule::new("Excellent", r"\bexcellent\b|\bexc\b"),
        ConditionRule::new("Very Good", r"\bvery\s*good\b"),
        ConditionRule::new("Good", r"\bgood\b"),
        ConditionRule::new(
            "Used",
            r"\bused\b|\bpre-?\s*owned\b|\bsecond[\s-]*hand\b|\b2nd[\s-]*hand\b",
        ),
        ConditionRule::new("Fair", r"\bfair\b"),
    ]
});

static RE_LIKE_NEW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\blike\s*new\b").unwrap());

/// Maps condition wording to the first matching label of a fixed ladder.
///
/// ```rust
/// use watchpack::extract::extract_condition;
///
/// assert_eq!(extract_condition("BNIB").as_deref(), Some("Brand New In Box"));
/// assert_eq!(extract_condition("like new").as_deref(), Some("Like New"));
/// assert_eq!(extract_condition("pre-owned").as_deref(), Some("Used"));
/// ```
pub fn extract_condition(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    let without_like_new = RE_LIKE_NEW.replace_all(&lowered, " ");

    CONDITION_LADDER
        .iter()
        .find(|rule| {
            let haystack: &str = if rule.ignores_like_new {
                &without_like_new
            } else {
                &lowered
            };
            rule.regex.is_match(haystack)
        })
        .map(|rule| rule.label.to_string())
}

// ============================================================================
// Variant
// ============================================================================

type Vocabulary = Vec<(&'static str, Regex)>;

fn vocabulary(entries: &[(&'static str, &str)]) -> Vocabulary {
    entries
        .iter()
        .map(|(label, pattern)| (*label, Regex::new(&format!(r"\b(?:{pattern})\b")).unwrap()))
        .collect()
}

static METALS: LazyLock<Vocabulary> = LazyLock::new(|| {
    vocabulary(&[
        ("ROSE GOLD", r"rose\s*gold|everose|rg"),
        ("WHITE GOLD", r"white\s*gold|wg"),
        ("YELLOW GOLD", r"yellow\s*gold|yg"),
        ("PLATINUM", r"platinum|pt950|plat"),
        ("TITANIUM", r"titanium|ti"),
        ("TWO TONE", r"two[\s-]*tone|rolesor|tt"),
        ("STEEL", r"stainless\s*steel|steel|ss"),
        ("CERAMIC", r"ceramic"),
        ("CARBON", r"carbon|ntpt"),
    ])
});

static COLORS: LazyLock<Vocabulary> = LazyLock::new(|| {
    vocabulary(&[
        ("ICE BLUE", r"ice\s*blue"),
        ("BLUE", r"blue"),
        ("BLACK", r"black|blk"),
        ("GREEN", r"green"),
        ("WHITE", r"white"),
        ("RED", r"red"),
        ("GREY", r"grey|gray"),
        ("SILVER", r"silver"),
        ("BROWN", r"brown|chocolate"),
        ("PINK", r"pink|salmon"),
        ("CHAMPAGNE", r"champagne|champ"),
        ("OLIVE", r"olive"),
        ("SLATE", r"slate"),
        ("MOP", r"mop|mother\s*of\s*pearl"),
        ("METEORITE", r"meteorite"),
    ])
});

static BRACELETS: LazyLock<Vocabulary> = LazyLock::new(|| {
    vocabulary(&[
        ("OYSTERFLEX", r"oysterflex"),
        ("JUBILEE", r"jubilee|jub"),
        ("OYSTER", r"oyster"),
        ("PRESIDENT", r"president"),
        ("LEATHER", r"leather"),
        ("RUBBER", r"rubber"),
    ])
});

/// Collects metal, dial color and bracelet labels, joined with `", "`.
///
/// Matched words are blanked before the next vocabulary runs, so
/// `white gold` yields `WHITE GOLD` and not also `WHITE`.
pub fn extract_variant(text: &str) -> Option<String> {
    let mut working = text.to_lowercase();
    let mut labels: Vec<&'static str> = Vec::new();

    for vocab in [&*METALS, &*COLORS, &*BRACELETS] {
        for &(label, ref regex) in vocab {
            if regex.is_match(&working) {
                if !labels.contains(&label) {
                    labels.push(label);
                }
                working = regex.replace_all(&working, " ").into_owned();
            }
        }
    }

    if labels.is_empty() {
        None
    } else {
        Some(labels.join(", "))
    }
}

// ============================================================================
// Month code
// ============================================================================

// `x` is the quantity marker (`x2`), never a month letter
static RE_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([A-WYZ])(\d{1,2})\b").unwrap());

/// Extracts a dealer month code such as `N6`: one letter followed by a
/// month number.
pub fn extract_month(text: &str) -> Option<String> {
    RE_MONTH.captures_iter(text).find_map(|caps| {
        let month: u32 = caps[2].parse().ok()?;
        (1..=12)
            .contains(&month)
            .then(|| format!("{}{}", caps[1].to_uppercase(), month))
    })
}
