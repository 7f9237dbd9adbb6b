use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use spamprep::config::DEFAULT_SEED;
use spamprep::lang::{FixedLanguage, LanguageDetector, WhatlangDetector};
use spamprep::{BalanceMode, Pipeline, PrepConfig};

/// Prepare a spam dataset: merge, dedup, augment, balance.
#[derive(Parser, Debug)]
#[command(name = "spamprep", version, about)]
struct Cli {
    /// Input files (text,label[,lang]); .csv, .tsv or .json
    #[arg(long, num_args = 1.., required = true)]
    inputs: Vec<PathBuf>,

    /// Output CSV path
    #[arg(long)]
    output: PathBuf,

    /// Number of augmentations per source row (0 = off)
    #[arg(long, default_value_t = 0)]
    augment: usize,

    /// Augment only the minority class
    #[arg(long)]
    augment_minority: bool,

    /// Class balancing strategy
    #[arg(long, value_enum, default_value_t = BalanceMode::None)]
    balance: BalanceMode,

    /// Drop rows shorter than this many characters (0 = no minimum)
    #[arg(long, default_value_t = 0)]
    min_chars: usize,

    /// Drop rows longer than this many characters (0 = no maximum)
    #[arg(long, default_value_t = 0)]
    max_chars: usize,

    /// Seed for augmentation, balancing and the final shuffle
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Language code for sources without a lang column (default: detect per row)
    #[arg(long)]
    assume_lang: Option<String>,

    /// Also write a JSON summary of the run here
    #[arg(long)]
    report: Option<PathBuf>,
}

impl From<&Cli> for PrepConfig {
    fn from(cli: &Cli) -> Self {
        PrepConfig {
            inputs: cli.inputs.clone(),
            output: cli.output.clone(),
            augment: cli.augment,
            augment_minority: cli.augment_minority,
            balance: cli.balance,
            min_chars: cli.min_chars,
            max_chars: cli.max_chars,
            seed: cli.seed,
            assume_lang: cli.assume_lang.clone(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = PrepConfig::from(&cli);

    let detector: Box<dyn LanguageDetector> = match &config.assume_lang {
        Some(code) => Box::new(FixedLanguage(code.clone())),
        None => Box::new(WhatlangDetector),
    };

    let report = Pipeline::new(&config)
        .run(detector.as_ref())
        .context("dataset preparation failed")?;

    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    println!("Wrote {} rows to {}", report.written, config.output.display());
    Ok(())
}
