//! AggregationService (§4.8): index-only rolled-up summaries at the
//! Survey, Platform, Respondent, and Session levels, built on the
//! `AggregateStore` seam so no summary fans out to per-session reads.

mod error;
mod scope;
mod service;
mod summary;

pub use error::{Error, Result};
pub use scope::{DateRange, Scope};
pub use service::summarize;
pub use summary::{
    BotDetectionSummary, DateRangeView, EventsSummary, FraudSummary, GridSummary, HierarchySummary, TextQualitySummary, TimingSummary,
};
