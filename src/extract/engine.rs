//! The extraction pipeline: gate, classify, detect headers, segment,
//! extract fields per segment, enrich, emit.

use std::sync::Arc;

use tracing::debug;

use super::classify::{classify, is_trade_message};
use super::fields::{
    blank_span, extract_condition, extract_month, extract_pid, extract_variant, extract_year,
};
use super::header::{HeaderContext, header_contexts};
use super::price::parse_price;
use super::requirement;
use super::segment::{Segment, Segmenter, clean_message, line_index_at, line_spans};
use crate::config::ExtractorConfig;
use crate::core::models::{ExtractedListing, MessageType, RequirementResult};
use crate::message::{RawMessage, SenderMeta};
use crate::reference::{ReferenceCache, ReferenceIndex};

/// Turns chat messages into listing and requirement records.
///
/// `Extractor` holds no per-message state and is `Send + Sync`; share one
/// behind an `Arc` across threads.
///
/// # Example
///
/// ```rust
/// use watchpack::{Extractor, ExtractorConfig};
///
/// let extractor = Extractor::new(ExtractorConfig::default());
/// let listings = extractor.parse("🍁5267/200A Champ 05/2025 New 798000HKD");
///
/// assert_eq!(listings.len(), 1);
/// assert_eq!(listings[0].pid, "5267/200A");
/// assert_eq!(listings[0].price, Some(798_000));
/// assert_eq!(listings[0].currency.as_deref(), Some("HKD"));
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    segmenter: Segmenter,
    references: Option<Arc<ReferenceCache>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            segmenter: Segmenter::new(config.min_segment_len),
            config,
            references: None,
        }
    }

    /// Enables catalog enrichment through a shared cache.
    #[must_use]
    pub fn with_references(mut self, cache: Arc<ReferenceCache>) -> Self {
        self.references = Some(cache);
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn references(&self) -> Option<&Arc<ReferenceCache>> {
        self.references.as_ref()
    }

    /// Extracts listings from bare text.
    pub fn parse(&self, text: &str) -> Vec<ExtractedListing> {
        self.parse_with_meta(text, &SenderMeta::default())
    }

    /// Extracts listings and copies the message metadata onto each.
    pub fn parse_message(&self, message: &RawMessage) -> Vec<ExtractedListing> {
        self.parse_with_meta(&message.text, &message.meta)
    }

    /// Extracts listings from text with the given metadata.
    pub fn parse_with_meta(&self, text: &str, meta: &SenderMeta) -> Vec<ExtractedListing> {
        if !is_trade_message(text) {
            debug!("not a trade message");
            return Vec::new();
        }

        let message_type = classify(text);
        let cleaned = clean_message(text, self.config.skip_media_placeholders);
        let spans = line_spans(&cleaned);
        let contexts = header_contexts(spans.iter().map(|(_, line)| *line));
        let segmentation = self.segmenter.segment(&cleaned);
        debug!(
            strategy = %segmentation.strategy,
            segments = segmentation.segments.len(),
            ?message_type,
            "segmented message"
        );

        let index = self.reference_index();
        segmentation
            .segments
            .iter()
            .filter_map(|segment| {
                let context = contexts[line_index_at(&spans, segment.offset)].as_ref();
                self.extract_segment(segment, context, message_type, index.as_deref())
                    .map(|listing| listing.with_meta(meta))
            })
            .collect()
    }

    /// Extracts buy requests from bare text.
    pub fn parse_requirements(&self, text: &str, meta: &SenderMeta) -> RequirementResult {
        let index = self.reference_index();
        requirement::parse_requirements(text, meta, index.as_deref())
    }

    fn reference_index(&self) -> Option<Arc<ReferenceIndex>> {
        self.references.as_ref().map(|cache| cache.index())
    }

    fn extract_segment(
        &self,
        segment: &Segment,
        context: Option<&HeaderContext>,
        message_type: MessageType,
        index: Option<&ReferenceIndex>,
    ) -> Option<ExtractedListing> {
        let pid = extract_pid(&segment.text)?;
        let rest = blank_span(&segment.text, pid.start, pid.end);

        let mut listing = ExtractedListing::new(pid.value, segment.text.clone(), message_type);
        listing.year = extract_year(&rest).or_else(|| context.and_then(|c| c.year.clone()));
        listing.condition =
            extract_condition(&rest).or_else(|| context.and_then(|c| c.condition.clone()));
        listing.brand_hint = context.and_then(|c| c.brand.clone());
        listing.variant = extract_variant(&rest);
        listing.month = extract_month(&rest);

        if let Some(quote) = parse_price(&rest, &self.config.fallback_currency) {
            listing.price = Some(quote.amount);
            listing.currency = Some(quote.currency);
        }

        if let Some(entry) = index.and_then(|idx| idx.lookup(&listing.pid)) {
            // empty catalog cells enrich as absent
            listing.brand = Some(entry.brand.clone()).filter(|s| !s.is_empty());
            listing.family = Some(entry.family.clone()).filter(|s| !s.is_empty());
            listing.name = Some(entry.name.clone()).filter(|s| !s.is_empty());
            listing.url = entry.url.clone().filter(|s| !s.is_empty());
        }

        Some(listing)
    }
}
