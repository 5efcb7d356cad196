//! # watchpack CLI
//!
//! Reads a chat export, extracts listings and buy requests, writes the
//! listings and prints a summary.

use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser as ClapParser;

use watchpack::cli::{Args, DEFAULT_OUTPUT};
use watchpack::config::ExtractorConfig;
use watchpack::core::{
    ExtractionStats, ListingFilter, OutputConfig, RequirementMatch, apply_filters,
    dedupe_listings,
};
use watchpack::format::{OutputFormat, write_to_format};
use watchpack::logging::init_tracing_subscriber;
use watchpack::parser::{Platform, create_parser};
use watchpack::reference::{CsvReferenceSource, JsonReferenceSource, ReferenceCache};
use watchpack::{Extractor, WatchpackError};

/// Buy requests echoed to the terminal before truncating.
const MAX_PRINTED_REQUIREMENTS: usize = 10;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), WatchpackError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    init_tracing_subscriber(args.verbose);

    let format: OutputFormat = args.format.into();
    let output_path = adjust_output_extension(&args.output, format);

    println!("⌚ watchpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📖 Source:  {}", args.source);
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path);
    println!("📄 Format:  {}", format);

    let config = load_config(&args)?;
    println!("💱 Currency: {} (when none given)", config.fallback_currency);

    let filter = build_filter(&args)?;
    println!();

    let mut extractor = Extractor::new(config.clone());
    if let Some(path) = &args.references {
        let cache = load_references(path, &config)?;
        extractor = extractor.with_references(Arc::new(cache));
    }

    // Step 1: Parse
    let platform: Platform = args.source.into();
    let parser = create_parser(platform);
    println!("⏳ Parsing {}...", parser.name());
    let parse_start = Instant::now();
    let messages = parser.parse(Path::new(&args.input))?;
    println!(
        "   Found {} messages ({:.2}s)",
        messages.len(),
        parse_start.elapsed().as_secs_f64()
    );

    // Step 2: Extract
    println!("🔎 Extracting listings...");
    let extract_start = Instant::now();
    let mut stats = ExtractionStats::new();
    let mut listings = Vec::new();
    let mut requirements: Vec<RequirementMatch> = Vec::new();

    for message in &messages {
        stats.messages += 1;
        let found = extractor.parse_message(message);
        if watchpack::extract::is_trade_message(&message.text) {
            stats.trade_messages += 1;
        }
        stats.record_listings(&found);
        listings.extend(found);

        let result = extractor.parse_requirements(&message.text, &message.meta);
        if result.is_requirement_message {
            stats.requirement_messages += 1;
            stats.requirements += result.requirements.len();
            requirements.extend(result.requirements);
        }
    }
    println!(
        "   {} listings from {} trade messages ({:.2}s)",
        stats.listings,
        stats.trade_messages,
        extract_start.elapsed().as_secs_f64()
    );

    // Step 3: Filter
    let filtered = if filter.is_active() {
        println!("🔍 Filtering listings...");
        let filtered = apply_filters(listings, &filter);
        println!("   {} listings after filtering", filtered.len());
        filtered
    } else {
        listings
    };

    // Step 4: De-duplicate (unless disabled)
    let final_listings = if args.no_dedupe {
        println!("⏭️  Skipping de-duplication (--no-dedupe)");
        filtered
    } else {
        dedupe_listings(filtered)
    };
    stats.kept_listings = final_listings.len();

    // Step 5: Write
    let mut output_config = OutputConfig::new();
    if args.timestamps {
        output_config = output_config.with_timestamps();
    }
    if args.senders {
        output_config = output_config.with_senders();
    }

    println!("💾 Writing {}...", format);
    write_to_format(&final_listings, &output_path, format, &output_config)?;

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    print_requirements(&requirements);
    print_summary(&stats, &filter, total_start);

    Ok(())
}

fn load_config(args: &Args) -> Result<ExtractorConfig, WatchpackError> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_json_file(path)?,
        None => ExtractorConfig::default(),
    };
    if let Some(currency) = &args.currency {
        config = config.with_fallback_currency(currency);
    }
    config.validate()?;
    Ok(config)
}

fn build_filter(args: &Args) -> Result<ListingFilter, WatchpackError> {
    let mut filter = ListingFilter::new();

    if let Some(pid) = &args.pid {
        filter = if args.prefix {
            filter.with_pid_prefix(pid)
        } else {
            filter.with_pid(pid)
        };
        println!("🏷️  PID:     {}{}", pid, if args.prefix { "*" } else { "" });
    }
    if let Some(after) = &args.after {
        filter = filter.with_date_from(after)?;
        println!("📅 After:   {}", after);
    }
    if let Some(before) = &args.before {
        filter = filter.with_date_to(before)?;
        println!("📅 Before:  {}", before);
    }
    if let Some(from) = &args.from {
        filter = filter.with_sender(from.clone());
        println!("👤 From:    {}", from);
    }

    Ok(filter)
}

/// Loads the catalog eagerly so a broken file fails the run up front.
fn load_references(path: &str, config: &ExtractorConfig) -> Result<ReferenceCache, WatchpackError> {
    let cache = if path.to_lowercase().ends_with(".json") {
        ReferenceCache::from_config(JsonReferenceSource::new(path), config)
    } else {
        ReferenceCache::from_config(CsvReferenceSource::new(path), config)
    };
    let count = cache.refresh()?;
    println!("📚 Loaded {} catalog entries from {}", count, path);
    Ok(cache)
}

fn print_requirements(requirements: &[RequirementMatch]) {
    if requirements.is_empty() {
        return;
    }

    println!();
    println!("🙋 Buy requests:");
    for req in requirements.iter().take(MAX_PRINTED_REQUIREMENTS) {
        let who = req.sender.as_deref().unwrap_or("unknown");
        let condition = req
            .condition
            .map(|c| format!(" ({c})"))
            .unwrap_or_default();
        let name = req
            .family
            .as_deref()
            .map(|f| format!(" {f}"))
            .unwrap_or_default();
        println!("   {} wants {}{}{}", who, req.pid, name, condition);
    }
    if requirements.len() > MAX_PRINTED_REQUIREMENTS {
        println!("   ... and {} more", requirements.len() - MAX_PRINTED_REQUIREMENTS);
    }
}

fn print_summary(stats: &ExtractionStats, filter: &ListingFilter, total_start: Instant) {
    println!();
    println!("📊 Summary:");
    println!("   Messages:      {}", stats.messages);
    println!("   Trade msgs:    {}", stats.trade_messages);
    println!(
        "   Listings:      {} ({:.1} per trade message)",
        stats.listings,
        stats.listings_per_message()
    );
    if stats.enriched > 0 {
        println!("   Enriched:      {}", stats.enriched);
    }
    if filter.is_active() || stats.kept_listings != stats.listings {
        println!(
            "   Written:       {} ({:.1}% removed)",
            stats.kept_listings,
            stats.reduction_ratio()
        );
    }
    println!(
        "   Buy requests:  {} messages, {} references",
        stats.requirement_messages, stats.requirements
    );

    let total_time = total_start.elapsed();
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let msgs_per_sec = stats.messages as f64 / total_time.as_secs_f64().max(f64::EPSILON);
    println!("   Throughput:  {:.0} messages/sec", msgs_per_sec);
}

/// Adjusts the output file extension to the format when using the default output.
fn adjust_output_extension(output: &str, format: OutputFormat) -> String {
    if output != DEFAULT_OUTPUT {
        return output.to_string();
    }
    format!("listings.{}", format.extension())
}
