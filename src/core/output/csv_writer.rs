//! CSV output writer.

use std::fs::File;
use std::io::Write;

use crate::core::models::{ExtractedListing, OutputConfig};
use crate::error::Result;

/// Writes listings to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `Series`, `PID`, `Brand`, `Family`, `Name`, `URL`, `Year`,
///   `Variant`, `Condition`, `Month`, `Price`, `Currency`, `Type`, then
///   - with senders: `Sender`, `Group`
///   - with timestamps: `Timestamp`
///
///   and finally `Raw Line`
/// - `Series` is the 1-based row number
/// - Encoding: UTF-8
pub fn write_csv(
    listings: &[ExtractedListing],
    output_path: &str,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(listings, file, config)
}

/// Converts listings to a CSV string.
///
/// Same format as [`write_csv`], but returns a String instead of writing to file.
pub fn to_csv(listings: &[ExtractedListing], config: &OutputConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(listings, &mut buffer, config)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_records<W: Write>(
    listings: &[ExtractedListing],
    sink: W,
    config: &OutputConfig,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(sink);

    writer.write_record(build_header(config))?;
    for (i, listing) in listings.iter().enumerate() {
        writer.write_record(build_record(i + 1, listing, config))?;
    }

    writer.flush()?;
    Ok(())
}

/// Build CSV header based on output configuration.
fn build_header(config: &OutputConfig) -> Vec<&'static str> {
    let mut header = vec![
        "Series", "PID", "Brand", "Family", "Name", "URL", "Year", "Variant", "Condition",
        "Month", "Price", "Currency", "Type",
    ];

    if config.include_senders {
        header.push("Sender");
        header.push("Group");
    }
    if config.include_timestamps {
        header.push("Timestamp");
    }

    header.push("Raw Line");
    header
}

/// Build CSV record for a single listing.
fn build_record(series: usize, listing: &ExtractedListing, config: &OutputConfig) -> Vec<String> {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();

    let mut record = vec![
        series.to_string(),
        listing.pid.clone(),
        // Catalog brand first, header brand otherwise
        listing
            .brand
            .clone()
            .or_else(|| listing.brand_hint.clone())
            .unwrap_or_default(),
        text(&listing.family),
        text(&listing.name),
        text(&listing.url),
        text(&listing.year),
        text(&listing.variant),
        text(&listing.condition),
        text(&listing.month),
        listing.price.map(|p| p.to_string()).unwrap_or_default(),
        text(&listing.currency),
        listing.message_type.to_string(),
    ];

    if config.include_senders {
        record.push(text(&listing.sender));
        record.push(text(&listing.group));
    }
    if config.include_timestamps {
        record.push(
            listing
                .timestamp
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        );
    }

    record.push(listing.raw_line.clone());
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::MessageType;
    use tempfile::NamedTempFile;

    fn sample() -> Vec<ExtractedListing> {
        vec![
            ExtractedListing::new("5711/1A", "5711/1A 2021 used 1.1m", MessageType::Selling)
                .with_price(1_100_000, "HKD")
                .with_year("2021")
                .with_condition("Used"),
            ExtractedListing::new("126610LN", "LF 126610LN", MessageType::LookingFor),
        ]
    }

    #[test]
    fn test_write_csv_basic() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        write_csv(&sample(), path, &OutputConfig::new()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();

        assert!(content.starts_with(
            "Series;PID;Brand;Family;Name;URL;Year;Variant;Condition;Month;Price;Currency;Type;Raw Line"
        ));
        assert!(content.contains("1;5711/1A;;;;;2021;;Used;;1100000;HKD;selling;5711/1A 2021 used 1.1m"));
        assert!(content.contains("2;126610LN;;;;;;;;;;;looking_for;LF 126610LN"));
    }

    #[test]
    fn test_to_csv_with_metadata() {
        use chrono::TimeZone;

        let ts = chrono::Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap();
        let mut listing = sample().remove(0);
        listing.sender = Some("Dealer".into());
        listing.group = Some("HK Traders".into());
        listing.timestamp = Some(ts);

        let csv = to_csv(&[listing], &OutputConfig::all()).unwrap();
        assert!(csv.contains(";Type;Sender;Group;Timestamp;Raw Line"));
        assert!(csv.contains(";selling;Dealer;HK Traders;2024-06-15 12:30:00;"));
    }

    #[test]
    fn test_brand_hint_used_when_not_enriched() {
        let mut listing = ExtractedListing::new("15500ST", "15500ST 300k", MessageType::Selling);
        listing.brand_hint = Some("Audemars Piguet".into());

        let csv = to_csv(&[listing], &OutputConfig::new()).unwrap();
        assert!(csv.contains("1;15500ST;Audemars Piguet;"));
    }

    #[test]
    fn test_url_column_follows_name() {
        let mut listing = ExtractedListing::new("126610LN", "126610LN 135k", MessageType::Selling);
        listing.name = Some("Submariner Date".into());
        listing.url = Some("https://example.com/126610ln".into());

        let csv = to_csv(&[listing], &OutputConfig::new()).unwrap();
        assert!(csv.contains(";Submariner Date;https://example.com/126610ln;"));
    }

    #[test]
    fn test_to_csv_empty_has_header_only() {
        let csv = to_csv(&[], &OutputConfig::new()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
