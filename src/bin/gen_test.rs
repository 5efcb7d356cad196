//! Synthetic WhatsApp export generator for stress testing watchpack.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [messages] [output] [seed]
//! Example: cargo run --features gen-test --bin gen_test -- 100000 "WhatsApp Chat with Stress Test.txt"

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// (reference, low price in thousands, high price in thousands)
const CATALOG: &[(&str, u32, u32)] = &[
    ("126610LN", 110, 150),
    ("126610LV", 120, 160),
    ("126500LN", 220, 290),
    ("126710BLRO", 140, 180),
    ("228238", 350, 420),
    ("5711/1A-010", 900, 1_300),
    ("5712/1A", 650, 800),
    ("5267/200A", 700, 820),
    ("5990/1A", 800, 950),
    ("15500ST", 250, 320),
    ("15510ST.OO.1320ST.06", 260, 330),
    ("26331ST", 240, 300),
    ("4500V/110A-B128", 220, 280),
    ("RM035-02", 1_800, 2_400),
    ("M79030N-0001", 28, 36),
    ("310.30.42.50.01.001", 45, 60),
    ("WSSA0030", 50, 65),
];

const CONDITIONS: &[&str] = &["new", "brand new", "BNIB", "used", "like new", "unworn", "mint"];
const VARIANTS: &[&str] = &["", "", "black", "blue", "green", "champ", "RG", "WG", "jub", "oyster"];
const HEADERS: &[&str] = &["🔥 AP used", "2024 all brand new", "PP new", "RLX used", "VC unworn"];
const SYMBOLS: &[&str] = &["🍁", "🔥", "⭐", "✅", "💎", "•", "-"];
const CURRENCIES: &[&str] = &["", "", "", "hkd", "HKD", "$", "usdt"];
const SENDERS: &[&str] = &[
    "Alice HK",
    "Bob Watches",
    "+852 9123 4567",
    "Dealer;Semicolon",
    "村上",
    "🔥Fire Dealer🔥",
    "Мария",
];
const CHATTER: &[&str] = &[
    "good morning everyone",
    "thanks bro",
    "ok",
    "<Media omitted>",
    "anyone at the office today?",
    "This message was deleted",
];

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args
        .get(2)
        .map_or("WhatsApp Chat with Stress Test.txt", String::as_str);
    let seed: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(42);

    println!("⌚ Listing Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages: {}", count);
    println!("   Output:   {}", output);
    println!("   Seed:     {}", seed);
    println!();

    let mut rng = StdRng::seed_from_u64(seed);
    let file = File::create(output)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);

    let start = Instant::now();
    let mut bytes_written: usize = 0;

    for i in 0..count {
        let sender = SENDERS.choose(&mut rng).copied().unwrap_or("Alice HK");
        let body = generate_message(&mut rng, i);
        let line = format!("{} - {}: {}\n", timestamp(i), sender, body);
        bytes_written += line.len();
        writer.write_all(line.as_bytes())?;

        if i % 1000 == 500 {
            let noise = generate_noise_line(&mut rng, i);
            bytes_written += noise.len();
            writer.write_all(noise.as_bytes())?;
        }

        if (i + 1) % 10_000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} msg/s)",
                i + 1,
                count,
                bytes_written as f64 / 1_000_000.0,
                (i + 1) as f64 / elapsed
            );
        }
    }

    writer.flush()?;

    let elapsed = start.elapsed();
    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", bytes_written as f64 / 1_000_000.0);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());
    Ok(())
}

/// EU slash export timestamps, one minute apart.
fn timestamp(i: usize) -> String {
    let minutes = i % (24 * 60);
    let day = (i / (24 * 60)) % 28 + 1;
    format!("{:02}/01/2025, {:02}:{:02}", day, minutes / 60, minutes % 60)
}

fn generate_message(rng: &mut impl Rng, index: usize) -> String {
    match index % 10 {
        0..=3 => listing_line(rng, ""),
        4 | 5 => {
            let header = HEADERS.choose(rng).copied().unwrap_or_default();
            let items: Vec<String> = (0..rng.gen_range(2..=6))
                .map(|_| listing_line(rng, ""))
                .collect();
            format!("{header}\n{}", items.join("\n"))
        }
        6 => {
            let symbol = SYMBOLS.choose(rng).copied().unwrap_or("•");
            (0..rng.gen_range(2..=8))
                .map(|_| listing_line(rng, symbol))
                .collect::<Vec<_>>()
                .join("\n")
        }
        7 => {
            let (pid, _, _) = CATALOG.choose(rng).copied().unwrap_or(CATALOG[0]);
            let condition = CONDITIONS.choose(rng).copied().unwrap_or_default();
            let phrase = ["LF", "looking for", "WTB", "need", "anyone has"]
                .choose(rng)
                .copied()
                .unwrap_or("LF");
            format!("{phrase} {pid} {condition}")
        }
        8 => CHATTER.choose(rng).copied().unwrap_or("ok").to_string(),
        _ => {
            // Emoji padding and keycap digits around a real listing
            let pad: String = (0..rng.gen_range(5..40)).map(|_| '🔥').collect();
            format!("{pad}\n1️⃣ {}\n{pad}", listing_line(rng, ""))
        }
    }
}

fn listing_line(rng: &mut impl Rng, symbol: &str) -> String {
    let (pid, low, high) = CATALOG.choose(rng).copied().unwrap_or(CATALOG[0]);
    let thousands = rng.gen_range(low..=high);
    let year = rng.gen_range(2018..=2025);
    let condition = CONDITIONS.choose(rng).copied().unwrap_or_default();
    let variant = VARIANTS.choose(rng).copied().unwrap_or_default();
    let currency = CURRENCIES.choose(rng).copied().unwrap_or_default();

    let price = match rng.gen_range(0..4) {
        0 => format!("{thousands}k"),
        1 => format!("{}", u64::from(thousands) * 1_000),
        2 if thousands >= 1_000 => format!("{:.2}m", f64::from(thousands) / 1_000.0),
        _ => format!("{},000", thousands),
    };
    let price = match currency {
        "$" => format!("${price}"),
        "" => price,
        code => format!("{price} {code}"),
    };

    format!("{symbol}{pid} {variant} {year} {condition} {price}")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_noise_line(rng: &mut impl Rng, i: usize) -> String {
    match rng.gen_range(0..4) {
        0 => format!("{} - Alice HK added Bob Watches\n", timestamp(i)),
        1 => "-------------------------------------------\n".to_string(),
        2 => "\n".to_string(),
        _ => "☠️💀👻 orphan line before any message 👻💀☠️\n".to_string(),
    }
}
