//! Writes a small synthetic spam/ham corpus for trying out `spamprep`.
//!
//! The corpus deliberately contains near-duplicates (case and spacing
//! changes), mixed-case labels and a skewed class ratio.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Parser, Debug)]
#[command(name = "generate_sample", about = "Generate a synthetic labelled corpus")]
struct Args {
    #[arg(long, default_value = "sample_data.csv")]
    output: PathBuf,

    /// Number of rows to generate
    #[arg(long, default_value_t = 200)]
    rows: usize,

    /// Fraction of rows labelled spam
    #[arg(long, default_value_t = 0.25)]
    spam_ratio: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const HAM_OPENERS: [&str; 6] = [
    "Are we still on for",
    "Don't forget about",
    "Can you pick up milk before",
    "Thanks again for",
    "Running late for",
    "Let me know about",
];
const HAM_OBJECTS: [&str; 5] = ["lunch", "the meeting", "dinner tonight", "practice", "the weekend"];

const SPAM_OPENERS: [&str; 5] = [
    "URGENT! You have won",
    "Claim your free",
    "Limited offer: get",
    "Congratulations, you qualify for",
    "Act now to receive",
];
const SPAM_OBJECTS: [&str; 5] = [
    "a $1000 gift card",
    "cash prize",
    "cheap meds",
    "a luxury cruise",
    "crypto bonus",
];

const LANGS: [&str; 3] = ["en", "en", "es"];

fn sentence<R: Rng>(openers: &[&str], objects: &[&str], rng: &mut R) -> String {
    let opener = openers.choose(rng).copied().unwrap_or_default();
    let object = objects.choose(rng).copied().unwrap_or_default();
    format!("{opener} {object}")
}

/// Re-case and re-space a text so it collides under dedup normalization.
fn near_duplicate<R: Rng>(text: &str, rng: &mut R) -> String {
    let spaced = text.replace(' ', if rng.gen_bool(0.5) { "  " } else { " \t" });
    if rng.gen_bool(0.5) {
        spaced.to_uppercase()
    } else {
        format!("  {spaced} ")
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record(["text", "label", "lang"])?;

    let mut previous: Vec<(String, &str)> = Vec::new();
    for _ in 0..args.rows {
        let (text, label) = if !previous.is_empty() && rng.gen_bool(0.1) {
            let (text, label) = previous[rng.gen_range(0..previous.len())].clone();
            (near_duplicate(&text, &mut rng), label)
        } else if rng.gen_bool(args.spam_ratio.clamp(0.0, 1.0)) {
            (sentence(&SPAM_OPENERS, &SPAM_OBJECTS, &mut rng), "spam")
        } else {
            (sentence(&HAM_OPENERS, &HAM_OBJECTS, &mut rng), "ham")
        };
        let shown_label = if rng.gen_bool(0.2) {
            label.to_uppercase()
        } else {
            label.to_string()
        };
        let lang = LANGS.choose(&mut rng).copied().unwrap_or("en");
        writer.write_record([text.as_str(), shown_label.as_str(), lang])?;
        previous.push((text, label));
    }
    writer.flush()?;

    println!("Wrote {} rows to {}", args.rows, args.output.display());
    Ok(())
}
