//! Property-based tests for watchpack.
//!
//! These tests generate random dealer posts to find edge cases.

use proptest::prelude::*;

use watchpack::core::{ListingFilter, apply_filters, dedupe_listings};
use watchpack::extract::{clean_message, normalize_pid, normalize_price};
use watchpack::{ExtractedListing, Extractor, MessageType, SenderMeta};

/// Generate one line of a dealer post from predefined fragments (no regex!)
fn arb_line() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "🍁", "🔥", "✅", "1. ", "•", "1\u{FE0F}\u{20E3}"]),
        prop::sample::select(vec![
            "126610LN", "5711/1A", "15500ST", "RM 35-02", "26331ST.OO.1220ST.03", "228238", "",
            "hello",
        ]),
        prop::sample::select(vec!["", "2024", "24y", "05/2025", "full set", "new", "used"]),
        prop::sample::select(vec!["", "135k", "1.2M", "798000HKD", "$135000", "18k rose gold"]),
    )
        .prop_map(|(symbol, pid, extra, price)| format!("{symbol}{pid} {extra} {price}"))
}

/// Generate a multi-line post, sometimes with a header and media lines
fn arb_post() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "2024 all brand new\n", "🔥 AP used\n", "<Media omitted>\n"]),
        prop::collection::vec(arb_line(), 0..8),
        prop::sample::select(vec!["\n", "\r\n", " // "]),
    )
        .prop_map(|(header, lines, sep)| format!("{header}{}", lines.join(sep)))
}

/// Text with no digits at all
fn arb_digitless() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "brand new", "full set", "LF", "AP", "rolex", "🔥", "k", "m", "hkd", "WTB", "Привет",
            "\n", "used", "papers",
        ]),
        0..12,
    )
    .prop_map(|words| words.join(" "))
}

fn arb_listing() -> impl Strategy<Value = ExtractedListing> {
    (
        prop::sample::select(vec!["126610LN", "5711/1A", "15500ST"]),
        prop::sample::select(vec![None, Some(135_000u64), Some(185_000)]),
        prop::sample::select(vec![None, Some("Alice"), Some("Bob")]),
    )
        .prop_map(|(pid, price, sender)| {
            let mut listing = ExtractedListing::new(pid, format!("{pid} line"), MessageType::Selling);
            listing.price = price;
            listing.sender = sender.map(str::to_string);
            listing
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // EXTRACTION PROPERTIES
    // ============================================

    /// Extraction never panics on arbitrary input
    #[test]
    fn extract_never_panics(text in any::<String>()) {
        let extractor = Extractor::default();
        let _ = extractor.parse(&text);
        let _ = extractor.parse_requirements(&text, &SenderMeta::default());
    }

    /// Extraction never panics on generated posts
    #[test]
    fn extract_posts_never_panics(post in arb_post()) {
        let _ = Extractor::default().parse(&post);
    }

    /// Every listing has a normalized reference that occurs in its source line
    #[test]
    fn listing_pid_comes_from_raw_line(post in arb_post()) {
        for listing in Extractor::default().parse(&post) {
            prop_assert!(!listing.pid.is_empty());
            prop_assert!(!listing.pid.chars().any(char::is_whitespace));
            prop_assert!(
                normalize_pid(&listing.raw_line).contains(&listing.pid),
                "{} not in {:?}", listing.pid, listing.raw_line
            );
        }
    }

    /// No digits means no reference and so no listing
    #[test]
    fn digitless_text_has_no_listings(text in arb_digitless()) {
        prop_assert!(Extractor::default().parse(&text).is_empty());
    }

    /// Extraction is deterministic
    #[test]
    fn extract_is_deterministic(post in arb_post()) {
        let extractor = Extractor::default();
        prop_assert_eq!(extractor.parse(&post), extractor.parse(&post));
    }

    // ============================================
    // NORMALIZATION PROPERTIES
    // ============================================

    /// Cleaning twice equals cleaning once
    #[test]
    fn clean_message_is_idempotent(text in any::<String>(), skip_media in any::<bool>()) {
        let once = clean_message(&text, skip_media);
        prop_assert_eq!(clean_message(&once, skip_media), once);
    }

    /// Reference normalization is idempotent
    #[test]
    fn normalize_pid_is_idempotent(raw in "[a-zA-Z0-9/ .-]{0,24}") {
        let once = normalize_pid(&raw);
        prop_assert_eq!(normalize_pid(&once), once);
    }

    /// `Nk` always means N thousand
    #[test]
    fn thousands_shorthand(n in 1u64..100_000) {
        prop_assert_eq!(normalize_price(&format!("{n}k")), Some(n * 1_000));
    }

    // ============================================
    // POST-PROCESSING PROPERTIES
    // ============================================

    /// Dedupe never increases count and is idempotent
    #[test]
    fn dedupe_shrinks_and_is_idempotent(listings in prop::collection::vec(arb_listing(), 0..20)) {
        let original_len = listings.len();
        let once = dedupe_listings(listings);
        prop_assert!(once.len() <= original_len);
        prop_assert_eq!(dedupe_listings(once.clone()), once);
    }

    /// No filter means passthrough
    #[test]
    fn no_filter_is_passthrough(listings in prop::collection::vec(arb_listing(), 0..20)) {
        let original = listings.clone();
        prop_assert_eq!(apply_filters(listings, &ListingFilter::new()), original);
    }

    /// Sender filter only keeps matching senders (case insensitive)
    #[test]
    fn sender_filter_only_keeps_matching(listings in prop::collection::vec(arb_listing(), 0..20)) {
        let filtered = apply_filters(listings, &ListingFilter::new().with_sender("alice"));
        for listing in &filtered {
            prop_assert_eq!(listing.sender.as_deref(), Some("Alice"));
        }
    }
}
