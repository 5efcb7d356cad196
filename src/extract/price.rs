//! Price and currency normalization.
//!
//! Dealers write prices in many shapes: `185k`, `1.2M`, `798000HKD`,
//! `HKD 798,000`, `$135000`, or a bare `1250000`. [`normalize_price`] walks an
//! ordered list of [`AmountRule`]s and returns the first amount that parses;
//! [`resolve_currency`] picks the currency by keyword precedence.

use std::sync::LazyLock;

use regex::Regex;

/// Four-digit prefixes of six-digit Rolex references. A bare six-digit
/// number starting with one of these is a model number, not a price.
pub const PID_NUMBER_PREFIXES: &[&str] = &[
    "1160", "1161", "1162", "1163", "1165", "1166", "1167", "1168", "1169", "1242", "1243", "1245",
    "1260", "1262", "1263", "1264", "1265", "1266", "1267", "1268", "1269", "2262", "2268", "2282",
    "2283", "2284", "2792", "2793", "2794", "3269", "3369",
];

/// Multiplier applied to a matched number.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scale {
    Unit,
    Thousand,
    Million,
}

impl Scale {
    fn factor(self) -> f64 {
        match self {
            Scale::Unit => 1.0,
            Scale::Thousand => 1_000.0,
            Scale::Million => 1_000_000.0,
        }
    }
}

/// One step of the price cascade. Group 1 of `regex` holds the number.
struct AmountRule {
    name: &'static str,
    regex: Regex,
    scale: Scale,
    /// Skip six-digit matches that look like a reference number.
    pid_guard: bool,
}

impl AmountRule {
    fn new(name: &'static str, pattern: &str, scale: Scale) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
            scale,
            pid_guard: false,
        }
    }

    fn guarded(mut self) -> Self {
        self.pid_guard = true;
        self
    }

    fn apply(&self, text: &str) -> Option<u64> {
        self.regex.captures_iter(text).find_map(|caps| {
            let raw = caps.get(1)?.as_str();
            if self.pid_guard && looks_like_pid_number(raw) {
                return None;
            }
            scaled_amount(raw, self.scale)
        })
    }
}

// Ordering matters: suffixed shorthand beats plain digits, and the bare
// six-plus digit rule runs last with the reference-number guard.
static AMOUNT_RULES: LazyLock<Vec<AmountRule>> = LazyLock::new(|| {
    vec![
        AmountRule::new("decimal_k", r"(\d+\.\d+)\s*k\b", Scale::Thousand),
        AmountRule::new("decimal_m", r"(\d+\.\d+)\s*m\b", Scale::Million),
        AmountRule::new("integer_k", r"(?:^|[^\d.])(\d+)\s*k\b", Scale::Thousand),
        AmountRule::new("integer_m", r"(?:^|[^\d.])(\d+)\s*m\b", Scale::Million),
        AmountRule::new(
            "million_word",
            r"(\d+(?:\.\d+)?)\s*mil(?:l(?:ion)?)?\b",
            Scale::Million,
        ),
        AmountRule::new(
            "currency_prefixed",
            r"(?:usdt|usd|hkd|eur|chf|gbp|\$|€|£)[:\s]\s*(\d{5,})",
            Scale::Unit,
        ),
        AmountRule::new(
            "currency_suffixed",
            r"(\d{5,})\s*(?:usdt|usd|hkd|eur|chf|gbp)\b",
            Scale::Unit,
        ),
        AmountRule::new(
            "currency_attached",
            r"(?:usdt|usd|hkd|eur|chf|gbp|\$|€|£)(\d{5,})",
            Scale::Unit,
        ),
        AmountRule::new("bare_digits", r"\b(\d{6,})\b", Scale::Unit).guarded(),
    ]
});

static RE_KARAT_GOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:9|10|14|18|22|24)\s*(?:k|kt|ct|karat|carat)\s*(?:(?:solid|rose|white|yellow|pink|red|everose|sedna|king|honey|moonshine)\s+)*gold\b|\b(?:9|10|14|18|22|24)\s*kt?\s*(?:rg|wg|yg|pg)\b",
    )
    .unwrap()
});

static RE_HK_DOLLAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"hk\s*\$").unwrap());

static RE_USDT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"usdt").unwrap());
static RE_USD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^a-z])usd(?:[^a-z]|$)|\$").unwrap());
static RE_EUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^a-z])eur(?:os?)?(?:[^a-z]|$)|€").unwrap());
static RE_CHF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^a-z])chf(?:[^a-z]|$)").unwrap());
static RE_GBP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^a-z])gbp(?:[^a-z]|$)|£").unwrap());
static RE_HKD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^a-z])hkd(?:[^a-z]|$)").unwrap());

/// A normalized price with its currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub amount: u64,
    pub currency: String,
}

/// Lower-cases the text, drops thousands separators and karat phrases, and
/// rewrites `hk$` to `hkd` so the dollar sign is not read as USD.
fn prepare(text: &str) -> String {
    let lowered = text.to_lowercase().replace(',', "");
    let lowered = RE_HK_DOLLAR.replace_all(&lowered, "hkd ");
    RE_KARAT_GOLD.replace_all(&lowered, " ").into_owned()
}

fn scaled_amount(raw: &str, scale: Scale) -> Option<u64> {
    let value: f64 = raw.parse().ok()?;
    let scaled = (value * scale.factor()).round();
    if !scaled.is_finite() || scaled < 1.0 || scaled >= u64::MAX as f64 {
        return None;
    }
    Some(scaled as u64)
}

/// Returns `true` for a six-digit number whose prefix marks it as a
/// reference number. Longer numbers are always treated as amounts.
pub fn looks_like_pid_number(digits: &str) -> bool {
    digits.len() == 6 && PID_NUMBER_PREFIXES.iter().any(|p| digits.starts_with(p))
}

/// Extracts an integer amount from free text.
///
/// Returns `None` when no rule matches or the amount is zero.
///
/// # Example
///
/// ```rust
/// use watchpack::extract::normalize_price;
///
/// assert_eq!(normalize_price("1.2M"), Some(1_200_000));
/// assert_eq!(normalize_price("840k"), Some(840_000));
/// assert_eq!(normalize_price("HKD 798,000"), Some(798_000));
/// assert_eq!(normalize_price("126508"), None);
/// ```
pub fn normalize_price(text: &str) -> Option<u64> {
    let prepared = prepare(text);
    AMOUNT_RULES.iter().find_map(|rule| {
        let amount = rule.apply(&prepared)?;
        tracing::trace!(rule = rule.name, amount, "price matched");
        Some(amount)
    })
}

/// Returns the currency explicitly named in the text, if any.
///
/// Precedence is USDT, USD (including a bare `$`), EUR, CHF, GBP, then HKD.
pub fn detect_currency(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    let lowered = RE_HK_DOLLAR.replace_all(&lowered, "hkd ");

    [
        (&*RE_USDT, "USDT"),
        (&*RE_USD, "USD"),
        (&*RE_EUR, "EUR"),
        (&*RE_CHF, "CHF"),
        (&*RE_GBP, "GBP"),
        (&*RE_HKD, "HKD"),
    ]
    .into_iter()
    .find(|(re, _)| re.is_match(&lowered))
    .map(|(_, code)| code)
}

/// Returns the explicit currency of the text, or `fallback`.
pub fn resolve_currency(text: &str, fallback: &str) -> String {
    detect_currency(text).map_or_else(|| fallback.to_string(), str::to_string)
}

/// Extracts price and currency together. Currency is only reported when a
/// price was found.
pub fn parse_price(text: &str, fallback_currency: &str) -> Option<PriceQuote> {
    normalize_price(text).map(|amount| PriceQuote {
        amount,
        currency: resolve_currency(text, fallback_currency),
    })
}
