//! Typed entry points over the scoring engine (§9): `Ingest`, the full
//! per-session scoring pipeline, and the hierarchical read API (§6.1),
//! composed behind a single `Client`.

mod client;
mod error;
mod ingest;
mod pipeline;
mod reads;

pub use client::Client;
pub use error::{Error, Result};
pub use reads::{HierarchicalReader, Page};
