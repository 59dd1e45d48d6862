//! Durable store for the bot-detection scoring engine (§3 data model, §4.1
//! indexes). Schema-on-write: every table mirrors a typed domain entity
//! from `botcheck-types` rather than a raw JSON blob.

mod db;
mod error;
mod queries;
mod schema;

pub use db::Database;
pub use error::{Error, Result};
