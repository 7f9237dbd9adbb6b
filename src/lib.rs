//! Preparation of labelled spam/ham text corpora for classifier training.
//!
//! Sources are merged, filtered by length, deduplicated, optionally
//! augmented with adversarial-looking variants, rebalanced per class and
//! shuffled. All randomness comes from one seeded generator, so a fixed
//! seed reproduces the output byte for byte.

pub mod augment;
pub mod balance;
pub mod config;
pub mod data;
pub mod error;
pub mod lang;
pub mod pipeline;

pub use config::{BalanceMode, PrepConfig};
pub use data::model::{Dataset, Label, Record};
pub use error::PrepError;
pub use pipeline::{Pipeline, PrepReport};
