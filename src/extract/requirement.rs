//! Buy-side extraction: every reference a buyer asks for, with the
//! condition they will accept.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::classify::{classify, has_requirement_keyword};
use super::fields::{PidMatcher, extract_all_pids};
use super::segment::{line_index_at, line_spans};
use crate::core::models::{ConditionPreference, MessageType, RequirementMatch, RequirementResult};
use crate::message::SenderMeta;
use crate::reference::ReferenceIndex;

/// Brand-aware cascade for requests. Unlike offers, a request often lists
/// several references, so every non-overlapping match is kept.
pub static REQUIREMENT_CASCADE: LazyLock<Vec<PidMatcher>> = LazyLock::new(|| {
    vec![
        PidMatcher::new(
            "ap_full",
            r"(?i)\b(\d{5}[A-Z]{2}\.[A-Z]{2}\.[A-Z0-9]{4,8}\.\d{2})\b",
        ),
        PidMatcher::new("vc_full", r"(?i)\b(\d{4}V/\d{3}[A-Z]-[A-Z0-9]{4})\b"),
        PidMatcher::new("omega", r"\b(\d{3}\.\d{2}\.\d{2}\.\d{2}\.\d{2}\.\d{3})\b"),
        PidMatcher::new("tudor", r"(?i)\b(M?\d{5}[A-Z]{0,3}-\d{4})\b"),
        PidMatcher::new(
            "patek_composite",
            r"(?i)\b(\d{4,5}(?:/\d{1,4})?[A-Z]{1,4}-\d{3,4})\b",
        ),
        PidMatcher::new("richard_mille", r"(?i)\b(RM\s?-?\d{2,3}(?:-\d{2})?)\b"),
        PidMatcher::new("cartier", r"(?i)\b((?:CR)?W[A-Z]{3}\d{4})\b"),
        PidMatcher::new("lange", r"(?i)\b(\d{3}\.\d{3}[A-Z]?)\b"),
        PidMatcher::new("patek_slash", r"(?i)\b(\d{4}/\d{1,4}[A-Z]{1,4})\b"),
        PidMatcher::new("letter_suffix", r"(?i)\b(\d{4,6}[A-Z]{1,6})\b"),
        PidMatcher::new("bare_digits", r"\b(\d{5,6})\b"),
    ]
});

static RE_BOTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bnew\s*(?:or|/|&|and)\s*used\b|\bused\s*(?:or|/|&|and)\s*new\b|\bany\s+condition\b|\bboth\b",
    )
    .unwrap()
});

static RE_WANTS_NEW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bbrand\s*new\b|\bbnib\b|\bnew\b|\bunworn\b|\bnos\b").unwrap()
});

static RE_WANTS_USED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bused\b|\bpre-?\s*owned\b|\bsecond[\s-]*hand\b|\b2nd[\s-]*hand\b").unwrap()
});

static RE_THOUSANDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}\.000$").unwrap());

/// Buckets condition wording into new, used or both.
pub fn condition_preference(text: &str) -> Option<ConditionPreference> {
    if RE_BOTH.is_match(text) {
        return Some(ConditionPreference::Both);
    }
    match (RE_WANTS_NEW.is_match(text), RE_WANTS_USED.is_match(text)) {
        (true, true) => Some(ConditionPreference::Both),
        (true, false) => Some(ConditionPreference::New),
        (false, true) => Some(ConditionPreference::Used),
        (false, false) => None,
    }
}

/// Extracts buy requests from one message.
///
/// A message counts as a request only when it passes the keyword gate and
/// the classifier agrees; otherwise the result is empty but still reports
/// the message type.
pub fn parse_requirements(
    text: &str,
    meta: &SenderMeta,
    index: Option<&ReferenceIndex>,
) -> RequirementResult {
    let message_type = classify(text);
    let is_requirement_message =
        has_requirement_keyword(text) && message_type == MessageType::LookingFor;

    if !is_requirement_message {
        return RequirementResult {
            requirements: Vec::new(),
            is_requirement_message,
            message_type,
        };
    }

    let message_condition = condition_preference(text);
    let spans = line_spans(text);
    let mut seen = HashSet::new();
    let mut requirements = Vec::new();

    for found in extract_all_pids(&REQUIREMENT_CASCADE, text) {
        if RE_THOUSANDS.is_match(&found.value) || !seen.insert(found.value.clone()) {
            continue;
        }
        let line = spans[line_index_at(&spans, found.start)].1.trim();
        let condition = condition_preference(line).or(message_condition);
        let mut item = RequirementMatch::new(found.value, line, condition).with_meta(meta);
        if let Some(entry) = index.and_then(|idx| idx.lookup(&item.pid)) {
            // empty catalog cells enrich as absent
            item.brand = Some(entry.brand.clone()).filter(|s| !s.is_empty());
            item.family = Some(entry.family.clone()).filter(|s| !s.is_empty());
            item.name = Some(entry.name.clone()).filter(|s| !s.is_empty());
            item.url = entry.url.clone().filter(|s| !s.is_empty());
        }
        requirements.push(item);
    }

    tracing::debug!(count = requirements.len(), "requirement message");
    RequirementResult {
        requirements,
        is_requirement_message,
        message_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceEntry;

    fn pids(result: &RequirementResult) -> Vec<&str> {
        result.requirements.iter().map(|r| r.pid.as_str()).collect()
    }

    #[test]
    fn test_single_requirement() {
        let result = parse_requirements("looking for 5711/1A", &SenderMeta::default(), None);
        assert!(result.is_requirement_message);
        assert_eq!(result.message_type, MessageType::LookingFor);
        assert_eq!(pids(&result), vec!["5711/1A"]);
        assert_eq!(result.requirements[0].raw_line, "looking for 5711/1A");
    }

    #[test]
    fn test_multiple_brands() {
        let text = "WTB\n26331ST.OO.1220ST.03\n5711/1A-010\nOmega 310.30.42.50.01.001\nRM 035-02\nTudor M79360N-0001";
        let result = parse_requirements(text, &SenderMeta::default(), None);
        assert_eq!(
            pids(&result),
            vec![
                "26331ST.OO.1220ST.03",
                "5711/1A-010",
                "310.30.42.50.01.001",
                "RM035-02",
                "M79360N-0001"
            ]
        );
    }

    #[test]
    fn test_duplicates_removed() {
        let result = parse_requirements(
            "looking for 126610LN, also 126610LN or 126500LN",
            &SenderMeta::default(),
            None,
        );
        assert_eq!(pids(&result), vec!["126610LN", "126500LN"]);
    }

    #[test]
    fn test_condition_per_line_then_message() {
        let text = "LF 5711/1A new\n126610LN used\n15500ST\nany condition ok";
        let result = parse_requirements(text, &SenderMeta::default(), None);
        let conditions: Vec<_> = result.requirements.iter().map(|r| r.condition).collect();
        assert_eq!(
            conditions,
            vec![
                Some(ConditionPreference::New),
                Some(ConditionPreference::Used),
                Some(ConditionPreference::Both),
            ]
        );
    }

    #[test]
    fn test_condition_preference_buckets() {
        assert_eq!(condition_preference("new or used"), Some(ConditionPreference::Both));
        assert_eq!(condition_preference("BNIB"), Some(ConditionPreference::New));
        assert_eq!(condition_preference("pre-owned ok"), Some(ConditionPreference::Used));
        assert_eq!(condition_preference("asap"), None);
    }

    #[test]
    fn test_selling_message_is_not_requirement() {
        let result = parse_requirements("5711/1A - 185k", &SenderMeta::default(), None);
        assert!(!result.is_requirement_message);
        assert!(result.requirements.is_empty());
        assert_eq!(result.message_type, MessageType::Selling);
    }

    #[test]
    fn test_metadata_and_enrichment() {
        let index = ReferenceIndex::build(vec![ReferenceEntry::new(
            "Patek Philippe",
            "Nautilus",
            "5711/1A-010",
            "Nautilus Blue",
        )]);
        let meta = SenderMeta::new().with_sender("Buyer");
        let result = parse_requirements("wtb 5711/1A", &meta, Some(&index));

        let item = &result.requirements[0];
        assert_eq!(item.sender.as_deref(), Some("Buyer"));
        assert_eq!(item.brand.as_deref(), Some("Patek Philippe"));
        assert_eq!(item.family.as_deref(), Some("Nautilus"));
    }

    #[test]
    fn test_enrichment_carries_url_and_skips_empty_cells() {
        let index = ReferenceIndex::build(vec![
            ReferenceEntry::new("Rolex", "", "126610LN", "")
                .with_url("https://example.com/126610ln"),
        ]);
        let result = parse_requirements("looking for 126610LN", &SenderMeta::default(), Some(&index));

        let item = &result.requirements[0];
        assert_eq!(item.brand.as_deref(), Some("Rolex"));
        assert_eq!(item.url.as_deref(), Some("https://example.com/126610ln"));
        assert!(item.family.is_none());
        assert!(item.name.is_none());
    }
}
