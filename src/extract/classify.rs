//! Message-level gates: is this a trade message at all, and is it an
//! offer or a buy request?

use std::sync::LazyLock;

use regex::Regex;

use crate::core::models::MessageType;

/// Evidence that a message is an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellingSignal {
    /// `5711/1A - 185k`
    CodeDashPrice,
    /// `5711/1A 185k`
    CodePriceShorthand,
    /// `fs`, `wts`
    ForSale,
    /// `both tags`
    BothTags,
    /// A link to a listing or catalog.
    Url,
    /// `05/2025`, `2024-03`
    DateLike,
}

static SELLING_SIGNALS: LazyLock<Vec<(SellingSignal, Regex)>> = LazyLock::new(|| {
    [
        (
            SellingSignal::CodeDashPrice,
            r"(?i)\b\d{3,6}[A-Z0-9/.-]*?(?:\s+-\s*|\s*-\s+|\s*[:=]\s*)(?:hkd|usdt|usd|\$)?\s*\d[\d,.]*\s*(?:k|m|hkd|usdt|usd)?\b|\b\d{3,6}[A-Z0-9/.]*-\s*\d[\d,.]*\s*[km]\b",
        ),
        (
            SellingSignal::CodePriceShorthand,
            r"(?i)\b\d{3,6}[A-Z0-9/.-]*\s+\$?\d[\d,.]*\s*[km]\b",
        ),
        (SellingSignal::ForSale, r"(?i)\b(?:fs|wts)\b"),
        (SellingSignal::BothTags, r"(?i)\bboth\s+tags?\b"),
        (SellingSignal::Url, r"(?i)https?://|\bwww\."),
        (
            SellingSignal::DateLike,
            r"(?:^|[^\d./-])(?:\d{1,2}/\d{4}|(?:19|20)\d{2}[-/.]\d{1,2}|\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4})(?:$|[^\d./-])",
        ),
    ]
    .into_iter()
    .map(|(signal, pattern)| (signal, Regex::new(pattern).unwrap()))
    .collect()
});

const BRAND_WORDS: &str = r"rolex|rlx|patek|pp|audemars|ap|richard\s*mille|rm|vacheron|vc|omega|cartier|tudor|lange|hublot|iwc|breguet|panerai|jlc|daytona|nautilus|aquanaut|royal\s*oak|submariner|gmt";

// The phrase must be followed by something that names a watch: a token
// with a digit or a brand word.
static RE_REQUIREMENT_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:looking\s+for|lf|want\s+to\s+buy|wtb|need(?:ed|s)?|searching(?:\s+for)?|seeking|iso|buying|anyone\s+(?:have|has|got)|if\s+(?:you|u|anyone)\s+(?:have|has|got))\b\s*[:\-]?\s*(?:(?:a|an|the|any|some|one)\s+)?(?:[a-z]*\d|(?:{BRAND_WORDS})\b)"
    ))
    .unwrap()
});

static RE_BRAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\b(?:{BRAND_WORDS}|philippe|piguet|constantin|journe|jaeger|blancpain|zenith)\b")).unwrap());

static RE_PID_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{4,6}(?:[A-Z]{1,6}|/\d{1,4}[A-Z]{0,4})|\b\d{5,6}\b|\bRM\s?-?\d{2,3}\b").unwrap()
});

static RE_PRICE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)hkd|usdt?|\beur\b|chf|gbp|[$€£]\s*\d|\b\d+(?:\.\d+)?\s*[km]\b").unwrap()
});

static RE_TRADE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:full\s*set|fullset|brand\s*new|bnib|lnib|unworn|used|pre-?owned|fs|wts|wtb|lf|looking\s+for|papers?|warranty|card|nos|mint)\b",
    )
    .unwrap()
});

static RE_REQUIREMENT_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:looking\s+for|lf|wtb|want\s+to\s+buy|need(?:ed|s)?|searching|seeking|iso|buying|anyone\s+(?:have|has|got)|if\s+(?:you|u|anyone)\s+(?:have|has|got))\b",
    )
    .unwrap()
});

/// Returns the first selling signal in the text.
pub fn selling_signal(text: &str) -> Option<SellingSignal> {
    SELLING_SIGNALS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(signal, _)| *signal)
}

/// Returns `true` if a buy-request phrase is followed by a watch token.
pub fn has_requirement_phrase(text: &str) -> bool {
    RE_REQUIREMENT_PHRASE.is_match(text)
}

/// Classifies a message. Selling evidence wins over request phrasing;
/// anything undecided is treated as selling.
///
/// # Example
///
/// ```rust
/// use watchpack::extract::classify;
/// use watchpack::MessageType;
///
/// assert_eq!(classify("looking for 5711/1A"), MessageType::LookingFor);
/// assert_eq!(classify("5711/1A 185k"), MessageType::Selling);
/// ```
pub fn classify(text: &str) -> MessageType {
    if let Some(signal) = selling_signal(text) {
        tracing::trace!(?signal, "selling signal");
        return MessageType::Selling;
    }
    if has_requirement_phrase(text) {
        return MessageType::LookingFor;
    }
    MessageType::Selling
}

/// Cheap pre-check that a message is about trading watches at all.
pub fn is_trade_message(text: &str) -> bool {
    RE_BRAND.is_match(text)
        || RE_PID_SHAPE.is_match(text)
        || RE_PRICE_SHAPE.is_match(text)
        || RE_TRADE_WORDS.is_match(text)
}

/// Keyword gate for buy requests.
pub fn has_requirement_keyword(text: &str) -> bool {
    RE_REQUIREMENT_WORDS.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_classification() {
        assert_eq!(classify("looking for 5711/1A"), MessageType::LookingFor);
        assert_eq!(classify("WTB 126610LN"), MessageType::LookingFor);
        assert_eq!(classify("anyone have AP 15500ST?"), MessageType::LookingFor);
        assert_eq!(classify("need rolex daytona"), MessageType::LookingFor);
    }

    #[test]
    fn test_selling_signals_win() {
        assert_eq!(
            selling_signal("5711/1A - 185k"),
            Some(SellingSignal::CodeDashPrice)
        );
        assert_eq!(
            selling_signal("126610LN 135k"),
            Some(SellingSignal::CodePriceShorthand)
        );
        assert_eq!(selling_signal("fs 5711"), Some(SellingSignal::ForSale));
        assert_eq!(selling_signal("both tags"), Some(SellingSignal::BothTags));
        assert_eq!(selling_signal("see https://x.y"), Some(SellingSignal::Url));
        assert_eq!(selling_signal("card 05/2025"), Some(SellingSignal::DateLike));

        assert_eq!(
            classify("looking for buyers: 126610LN 135k"),
            MessageType::Selling
        );
    }

    #[test]
    fn test_default_is_selling() {
        assert_eq!(classify("126610LN"), MessageType::Selling);
        assert_eq!(classify("I need to go home"), MessageType::Selling);
    }

    #[test]
    fn test_trade_gate() {
        assert!(is_trade_message("Rolex daytona"));
        assert!(is_trade_message("126610LN"));
        assert!(is_trade_message("185k"));
        assert!(is_trade_message("full set"));
        assert!(!is_trade_message("good morning everyone"));
        assert!(!is_trade_message("see you at 5 pm"));
    }

    #[test]
    fn test_requirement_keyword() {
        assert!(has_requirement_keyword("LF 5711"));
        assert!(has_requirement_keyword("wtb"));
        assert!(!has_requirement_keyword("126610LN 135k"));
    }
}
