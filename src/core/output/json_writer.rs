//! JSON output writer.

use std::fs::File;
use std::io::Write;

use super::JsonListing;
use crate::core::models::{ExtractedListing, OutputConfig};
use crate::error::Result;

/// Writes listings to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"pid": "5711/1A", "price": 185000, "currency": "HKD", "message_type": "selling", "raw_line": "5711/1A 185k"},
///   {"pid": "126610LN", "message_type": "looking_for", "raw_line": "LF 126610LN"}
/// ]
/// ```
pub fn write_json(
    listings: &[ExtractedListing],
    output_path: &str,
    config: &OutputConfig,
) -> Result<()> {
    let json = to_json(listings, config)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts listings to a pretty-printed JSON array.
///
/// Same format as [`write_json`], but returns a String instead of writing to file.
pub fn to_json(listings: &[ExtractedListing], config: &OutputConfig) -> Result<String> {
    let json_listings: Vec<JsonListing<'_>> = listings
        .iter()
        .map(|l| JsonListing::from_listing(l, config))
        .collect();

    Ok(serde_json::to_string_pretty(&json_listings)?)
}
