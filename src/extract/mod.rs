//! Message-to-record extraction engine.
//!
//! The entry point is [`Extractor`]. The building blocks are public so they
//! can be tested and reused on their own:
//!
//! - [`price`] - amount and currency normalization
//! - [`fields`] - PID cascade, year, condition, variant, month code
//! - [`header`] - section headers whose values apply to following items
//! - [`segment`] - splitting multi-item posts
//! - [`classify`] - trade gate and offer/request classification
//! - [`requirement`] - buy-request extraction

pub mod classify;
mod engine;
pub mod fields;
pub mod header;
pub mod price;
pub mod requirement;
pub mod segment;

pub use classify::{SellingSignal, classify, has_requirement_keyword, is_trade_message};
pub use engine::Extractor;
pub use fields::{
    PidMatch, PidMatcher, SELLING_CASCADE, extract_all_pids, extract_condition, extract_month,
    extract_pid, extract_variant, extract_year, normalize_pid,
};
pub use header::{HeaderContext, HeaderShape, detect_header, header_contexts};
pub use price::{PriceQuote, detect_currency, normalize_price, parse_price, resolve_currency};
pub use requirement::{REQUIREMENT_CASCADE, condition_preference};
pub use segment::{Segment, Segmentation, Segmenter, Strategy, clean_message};
