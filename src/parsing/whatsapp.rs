//! WhatsApp export line grammar.
//!
//! Date formats, format auto-detection and system-message recognition for
//! WhatsApp TXT exports. Used by [`crate::parsers::WhatsAppParser`].

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

/// Number of leading lines inspected by [`detect_whatsapp_format`].
pub const DETECTION_SAMPLE: usize = 20;

/// Date format variants seen in WhatsApp exports.
///
/// The variant depends on the exporting phone's platform and locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// iOS, US locale: `[1/15/24, 10:30:45 AM] Sender: Message`
    US,
    /// Android, US locale: `1/15/24, 10:30 AM - Sender: Message`
    UsDash,
    /// `[15.01.24, 10:30:45] Sender: Message`
    EuDotBracketed,
    /// `26.10.2025, 20:40 - Sender: Message`
    EuDotNoBracket,
    /// Android, UK/HK locale: `15/01/2024, 10:30 - Sender: Message`
    EuSlash,
    /// iOS, UK/HK locale: `[15/01/2024, 10:30:45] Sender: Message`
    EuSlashBracketed,
}

impl DateFormat {
    /// Line pattern capturing date, time, sender and first content line.
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::US => {
                r"^\[(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?::\d{2})?\s?[APap][Mm])\]\s([^:]+):\s?(.*)"
            }
            DateFormat::UsDash => {
                r"^(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?::\d{2})?\s?[APap][Mm])\s-\s([^:]+):\s?(.*)"
            }
            DateFormat::EuDotBracketed => {
                r"^\[(\d{2}\.\d{2}\.\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\]\s([^:]+):\s?(.*)"
            }
            DateFormat::EuDotNoBracket => {
                r"^(\d{2}\.\d{2}\.\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\s-\s([^:]+):\s?(.*)"
            }
            DateFormat::EuSlash => {
                r"^(\d{2}/\d{2}/\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\s-\s([^:]+):\s?(.*)"
            }
            DateFormat::EuSlashBracketed => {
                r"^\[(\d{2}/\d{2}/\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\]\s([^:]+):\s?(.*)"
            }
        }
    }

    /// chrono formats tried, in order, on `"{date}, {time}"`.
    pub fn date_parse_formats(self) -> &'static [&'static str] {
        match self {
            DateFormat::US | DateFormat::UsDash => &[
                "%m/%d/%y, %I:%M:%S %p",
                "%m/%d/%y, %I:%M %p",
                "%m/%d/%Y, %I:%M:%S %p",
                "%m/%d/%Y, %I:%M %p",
            ],
            DateFormat::EuDotBracketed | DateFormat::EuDotNoBracket => &[
                "%d.%m.%y, %H:%M:%S",
                "%d.%m.%y, %H:%M",
                "%d.%m.%Y, %H:%M:%S",
                "%d.%m.%Y, %H:%M",
            ],
            DateFormat::EuSlash | DateFormat::EuSlashBracketed => &[
                "%d/%m/%y, %H:%M:%S",
                "%d/%m/%y, %H:%M",
                "%d/%m/%Y, %H:%M:%S",
                "%d/%m/%Y, %H:%M",
            ],
        }
    }

    /// All variants, in detection tie-break order.
    pub fn all() -> &'static [DateFormat] {
        &[
            DateFormat::US,
            DateFormat::UsDash,
            DateFormat::EuDotBracketed,
            DateFormat::EuDotNoBracket,
            DateFormat::EuSlash,
            DateFormat::EuSlashBracketed,
        ]
    }

    /// Compiled line regex for this variant.
    pub fn regex(self) -> &'static Regex {
        static COMPILED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
            DateFormat::all()
                .iter()
                .map(|f| Regex::new(f.pattern()).unwrap())
                .collect()
        });
        // `all()` lists the variants in declaration order
        &COMPILED[self as usize]
    }
}

static RE_TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[?\d{1,2}[./]\d{1,2}[./]\d{2,4},\s\d{1,2}:\d{2}").unwrap()
});

/// Returns `true` if the line starts with an export timestamp.
///
/// A timestamped line that does not match the message pattern is a notice
/// without a sender, e.g. `15/01/2024, 10:30 - Alice added Bob`.
pub fn has_timestamp_prefix(line: &str) -> bool {
    RE_TIMESTAMP_PREFIX.is_match(strip_direction_marks(line))
}

/// Parses the date and time captured from a message line.
///
/// AM/PM is accepted in either case and with or without a space.
pub fn parse_whatsapp_timestamp(
    date_str: &str,
    time_str: &str,
    format: DateFormat,
) -> Option<DateTime<Utc>> {
    let time = normalize_meridiem(time_str);
    let datetime_str = format!("{date_str}, {time}");

    format
        .date_parse_formats()
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(&datetime_str, f).ok())
        .map(|naive| naive.and_utc())
}

fn normalize_meridiem(time: &str) -> String {
    let upper = time.trim().to_uppercase();
    match upper.strip_suffix("AM").or_else(|| upper.strip_suffix("PM")) {
        Some(clock) => format!("{} {}", clock.trim_end(), &upper[upper.len() - 2..]),
        None => upper,
    }
}

/// Notices WhatsApp itself writes into a chat.
const SYSTEM_PHRASES: &[&str] = &[
    "messages and calls are end-to-end encrypted",
    "created group",
    "changed the subject",
    "changed this group's icon",
    "changed the group description",
    "deleted this group's icon",
    "changed their phone number",
    "joined using this group's invite link",
    "security code changed",
    "you're now an admin",
    "is now an admin",
    "turned on disappearing messages",
    "turned off disappearing messages",
    "this message was deleted",
];

/// Membership notices. Only counted when the content carries no digits, so
/// a dealer writing "just added 5711/1A to stock" is not dropped.
const MEMBERSHIP_WORDS: &[&str] = &["added", "removed", "left", "joined"];

/// Returns `true` if the line is a WhatsApp notice rather than a user message.
pub fn is_whatsapp_system_message(sender: &str, content: &str) -> bool {
    let sender_lower = sender.trim().to_lowercase();
    if sender_lower.is_empty() || sender_lower == "whatsapp" || sender_lower == "system" {
        return true;
    }

    let content_lower = content.to_lowercase();
    if SYSTEM_PHRASES.iter().any(|p| content_lower.contains(p)) {
        return true;
    }

    !content.chars().any(|c| c.is_ascii_digit())
        && content_lower
            .split_whitespace()
            .any(|word| MEMBERSHIP_WORDS.contains(&word))
}

/// Picks the variant matching the most sample lines.
///
/// Returns `None` if no line matches any variant. Ties go to the earlier
/// variant in [`DateFormat::all`].
pub fn detect_whatsapp_format(lines: &[&str]) -> Option<DateFormat> {
    let (format, score) = DateFormat::all()
        .iter()
        .map(|&f| {
            let regex = f.regex();
            let score = lines
                .iter()
                .filter(|line| regex.is_match(strip_direction_marks(line)))
                .count();
            (f, score)
        })
        .fold(None, |best: Option<(DateFormat, usize)>, (f, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((f, score)),
        })?;

    (score > 0).then_some(format)
}

/// Drops the left-to-right marks iOS puts in front of some lines.
pub fn strip_direction_marks(line: &str) -> &str {
    line.trim_start_matches(['\u{200e}', '\u{200f}'])
}

/// Turns an export file stem into a group name.
///
/// `"WhatsApp Chat with HK Watch Traders"` becomes `"HK Watch Traders"`.
pub fn group_name_from_stem(stem: &str) -> Option<String> {
    let name = stem
        .strip_prefix("WhatsApp Chat with ")
        .or_else(|| stem.strip_prefix("WhatsApp Chat - "))
        .unwrap_or(stem)
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}
