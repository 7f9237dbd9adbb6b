//! Data layer: core types, loading, filtering, dedup and output.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json  (one or more)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  schema check, label validation, language tagging
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  Vec<Record { text, label, language }>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐    ┌──────────┐
//!   │  filter   │ ─▶ │  dedup    │  length window, first-seen wins
//!   └──────────┘    └──────────┘
//!        ┆  (augment / balance / shuffle live outside `data`)
//!        ▼
//!   ┌──────────┐
//!   │  writer   │  text,label,lang
//!   └──────────┘
//! ```

pub mod dedup;
pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
