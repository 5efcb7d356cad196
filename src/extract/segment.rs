//! Message cleaning and splitting into per-item segments.
//!
//! A dealer post may carry one watch or forty. [`Segmenter::segment`] tries
//! a fixed series of strategies and keeps the first one that yields more
//! than one substantive segment; a message no strategy can split becomes a
//! single segment.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::fields::extract_pid;
use super::header::detect_header;
use super::price::normalize_price;

/// Bullet symbols dealers use most often to start an item.
pub const PRIMARY_SYMBOLS: &[&str] = &[
    "🍁", "🔥", "⭐", "✅", "💎", "🌟", "⌚", "🔹", "🔸", "▪", "•", "👉", "➡", "⚜", "🌹", "🏆", "📌",
];

/// Less common bullets, tried after numbered lists.
pub const ALTERNATE_SYMBOLS: &[&str] = &[
    "❤", "♥", "💰", "🎁", "📍", "🟢", "🔴", "🔵", "⚫", "⚪", "◆", "◇", "★", "☆", "✨", "✔", "☑",
    "➤", "►", "▶", "🔘", "🌸",
];

const INVISIBLE_CHARS: &[char] = &[
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{200E}', '\u{200F}', '\u{2060}', '\u{FEFF}', '\u{FE0E}',
    '\u{FE0F}',
];

static RE_MEDIA_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*<?\s*(?:media|image|video|audio|sticker|gif|document)\s+omitted\s*>?\s*$|^\s*(?:this message was deleted|you deleted this message)\s*$|^\s*photo\s*$|^\s*<?\s*attached:",
    )
    .unwrap()
});

static RE_NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d{1,2}\s*(?:[:)]|\.(?:\s|$))").unwrap());

static RE_BARE_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[$€£]?\s*[\d,.]+\s*[km]?\s*(?:hkd|usdt|usd|eur|chf|gbp)?\s*$").unwrap()
});

static RE_LOOSE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d{4,6}\b|hkd|usdt?|\beur\b|chf|gbp|[$€£]").unwrap());

/// Normalizes line endings, strips invisible characters and (optionally)
/// media placeholder lines.
///
/// Keycap marks become spaces so `1️⃣5711/1A` does not fuse into one number.
pub fn clean_message(text: &str, skip_media: bool) -> String {
    let normalized: String = text
        .replace("\r\n", "\n")
        .chars()
        .filter(|c| !INVISIBLE_CHARS.contains(c))
        .map(|c| match c {
            '\r' => '\n',
            '\u{20E3}' | '\u{00A0}' | '\u{202F}' => ' ',
            other => other,
        })
        .collect();

    if !skip_media {
        return normalized;
    }
    normalized
        .split('\n')
        .filter(|line| !RE_MEDIA_PLACEHOLDER.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lines of `text` paired with their byte offsets.
pub fn line_spans(text: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    text.split('\n')
        .map(|line| {
            let start = offset;
            offset += line.len() + 1;
            (start, line)
        })
        .collect()
}

/// Index of the line containing byte `offset`.
pub fn line_index_at(spans: &[(usize, &str)], offset: usize) -> usize {
    spans
        .partition_point(|(start, _)| *start <= offset)
        .saturating_sub(1)
}

/// A slice of a message believed to describe one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Trimmed text, verbatim from the cleaned message.
    pub text: String,
    /// Byte offset of `text` in the cleaned message.
    pub offset: usize,
}

impl Segment {
    fn from_slice(offset: usize, slice: &str) -> Option<Self> {
        let trimmed = slice.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lead = slice.len() - slice.trim_start().len();
        Some(Self {
            text: trimmed.to_string(),
            offset: offset + lead,
        })
    }

    /// Ends the segment before the first header line that follows an item
    /// line; that header belongs to the items after it.
    fn end_before_header(self) -> Self {
        let mut seen_pid = false;
        for (start, line) in line_spans(&self.text) {
            if seen_pid && detect_header(line).is_some() {
                let text = self.text[..start].trim_end().to_string();
                return Self { text, ..self };
            }
            seen_pid |= extract_pid(line).is_some();
        }
        self
    }
}

/// Which splitting strategy produced the segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    PrimarySymbols,
    NumberedList,
    AlternateSymbols,
    PidLines,
    LooseLines,
    BlankLineBlocks,
    WholeMessage,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::PrimarySymbols => "primary symbols",
            Strategy::NumberedList => "numbered list",
            Strategy::AlternateSymbols => "alternate symbols",
            Strategy::PidLines => "pid lines",
            Strategy::LooseLines => "loose lines",
            Strategy::BlankLineBlocks => "blank-line blocks",
            Strategy::WholeMessage => "whole message",
        };
        write!(f, "{name}")
    }
}

/// Result of segmenting one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub strategy: Strategy,
    pub segments: Vec<Segment>,
}

/// Splits cleaned message text into item segments.
#[derive(Debug, Clone)]
pub struct Segmenter {
    min_len: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Segmenter {
    /// Creates a segmenter; segments of `min_len` characters or fewer
    /// without a reference number are trivial.
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }

    fn is_substantive(&self, segment: &Segment) -> bool {
        segment.text.chars().count() > self.min_len || extract_pid(&segment.text).is_some()
    }

    /// Keeps the substantive segments if there are at least two.
    fn accept(&self, segments: Vec<Segment>) -> Option<Vec<Segment>> {
        let kept: Vec<Segment> = segments
            .into_iter()
            .map(Segment::end_before_header)
            .filter(|s| self.is_substantive(s))
            .collect();
        (kept.len() > 1).then_some(kept)
    }

    /// Runs the strategies in order and returns the first that splits.
    ///
    /// # Example
    ///
    /// ```rust
    /// use watchpack::extract::{Segmenter, Strategy};
    ///
    /// let seg = Segmenter::default().segment("Stock:\n🍁126610LN 135k\n🍁5711/1A 1.2M");
    /// assert_eq!(seg.strategy, Strategy::PrimarySymbols);
    /// assert_eq!(seg.segments.len(), 2);
    /// ```
    pub fn segment(&self, text: &str) -> Segmentation {
        let split = self
            .by_symbols(text, PRIMARY_SYMBOLS)
            .map(|s| (Strategy::PrimarySymbols, s))
            .or_else(|| {
                self.by_numbered_lines(text)
                    .map(|s| (Strategy::NumberedList, s))
            })
            .or_else(|| {
                self.by_symbols(text, ALTERNATE_SYMBOLS)
                    .map(|s| (Strategy::AlternateSymbols, s))
            })
            .or_else(|| self.by_pid_lines(text).map(|s| (Strategy::PidLines, s)))
            .or_else(|| self.by_loose_lines(text).map(|s| (Strategy::LooseLines, s)))
            .or_else(|| {
                self.by_blank_line_blocks(text)
                    .map(|s| (Strategy::BlankLineBlocks, s))
            });

        match split {
            Some((strategy, segments)) => Segmentation { strategy, segments },
            None => Segmentation {
                strategy: Strategy::WholeMessage,
                segments: Segment::from_slice(0, text).into_iter().collect(),
            },
        }
    }

    fn by_symbols(&self, text: &str, symbols: &[&str]) -> Option<Vec<Segment>> {
        let mut best: Option<(&str, usize)> = None;
        for &symbol in symbols {
            let count = text.matches(symbol).count();
            if count > 0 && best.is_none_or(|(_, top)| count > top) {
                best = Some((symbol, count));
            }
        }
        let (symbol, _) = best?;

        let mut pieces = Vec::new();
        let mut start = 0;
        for (idx, _) in text.match_indices(symbol) {
            pieces.push((start, &text[start..idx]));
            start = idx + symbol.len();
        }
        pieces.push((start, &text[start..]));

        // text before the first bullet is a banner
        let segments = pieces
            .into_iter()
            .skip(1)
            .filter_map(|(offset, piece)| Segment::from_slice(offset, piece))
            .collect();
        self.accept(segments)
    }

    fn by_numbered_lines(&self, text: &str) -> Option<Vec<Segment>> {
        let mut blocks: Vec<(usize, usize)> = Vec::new();
        for (start, line) in line_spans(text) {
            let end = start + line.len();
            if RE_NUMBERED.is_match(line) {
                blocks.push((start, end));
            } else if let Some(block) = blocks.last_mut() {
                block.1 = end;
            }
        }
        let segments = blocks
            .into_iter()
            .filter_map(|(start, end)| Segment::from_slice(start, &text[start..end]))
            .collect();
        self.accept(segments)
    }

    fn by_pid_lines(&self, text: &str) -> Option<Vec<Segment>> {
        let mut units: Vec<(usize, &str)> = Vec::new();
        for (line_start, line) in line_spans(text) {
            let mut offset = line_start;
            for part in line.split("//") {
                if !part.trim().is_empty() {
                    units.push((offset, part));
                }
                offset += part.len() + 2;
            }
        }

        let mut segments = Vec::new();
        let mut i = 0;
        while i < units.len() {
            let (start, unit) = units[i];
            if let Some(pid) = extract_pid(unit) {
                let has_price = normalize_price(unit).is_some();
                let leading = unit[..pid.start].chars().all(|c| !c.is_alphanumeric());
                if leading || has_price {
                    let mut end = start + unit.len();
                    // price on the following line
                    if !has_price {
                        if let Some(&(next_start, next)) = units.get(i + 1) {
                            if is_price_continuation(next) {
                                end = next_start + next.len();
                                i += 1;
                            }
                        }
                    }
                    segments.extend(Segment::from_slice(start, &text[start..end]));
                }
            }
            i += 1;
        }
        self.accept(segments)
    }

    fn by_loose_lines(&self, text: &str) -> Option<Vec<Segment>> {
        let segments = line_spans(text)
            .into_iter()
            .filter(|(_, line)| RE_LOOSE_LINE.is_match(line))
            .filter_map(|(start, line)| Segment::from_slice(start, line))
            .collect();
        self.accept(segments)
    }

    fn by_blank_line_blocks(&self, text: &str) -> Option<Vec<Segment>> {
        let mut blocks: Vec<(usize, usize)> = Vec::new();
        let mut open = false;
        for (start, line) in line_spans(text) {
            let end = start + line.len();
            if line.trim().is_empty() {
                open = false;
            } else if open {
                if let Some(block) = blocks.last_mut() {
                    block.1 = end;
                }
            } else {
                blocks.push((start, end));
                open = true;
            }
        }
        let segments = blocks
            .into_iter()
            .filter_map(|(start, end)| Segment::from_slice(start, &text[start..end]))
            .filter(|s| extract_pid(&s.text).is_some())
            .collect();
        self.accept(segments)
    }
}

fn is_price_continuation(line: &str) -> bool {
    RE_BARE_AMOUNT.is_match(line) || (extract_pid(line).is_none() && normalize_price(line).is_some())
}
