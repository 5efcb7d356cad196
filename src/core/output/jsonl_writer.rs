//! JSON Lines (JSONL) output writer.
//!
//! One listing per line, so runs can be appended to a price log and read
//! back a record at a time.

use std::fs::File;
use std::io::{BufWriter, Write};

use super::JsonListing;
use crate::core::models::{ExtractedListing, OutputConfig};
use crate::error::Result;

/// Writes listings to JSONL (JSON Lines) format.
///
/// Each line is a valid JSON object:
/// ```jsonl
/// {"pid":"5711/1A","price":185000,"currency":"HKD","message_type":"selling","raw_line":"5711/1A 185k"}
/// {"pid":"126610LN","message_type":"looking_for","raw_line":"LF 126610LN"}
/// ```
pub fn write_jsonl(
    listings: &[ExtractedListing],
    output_path: &str,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(listings, &mut writer, config)?;
    writer.flush()?;
    Ok(())
}

/// Converts listings to a JSONL string.
pub fn to_jsonl(listings: &[ExtractedListing], config: &OutputConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_lines(listings, &mut buffer, config)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_lines<W: Write>(
    listings: &[ExtractedListing],
    writer: &mut W,
    config: &OutputConfig,
) -> Result<()> {
    for listing in listings {
        let line = serde_json::to_string(&JsonListing::from_listing(listing, config))?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
