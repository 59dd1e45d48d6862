//! Orchestration layer over the pure analyzers in `botcheck-analyzers`:
//! the `TextQualityAnalyzer` (calls the `TextClassifier` seam), the
//! cross-session `FraudAnalyzer` (calls the `Store` seam), and the
//! `CompositeScorer` that blends both with the behavioral composite (§4.3,
//! §4.4, §4.7).

mod composite;
mod error;
mod fraud;
mod text_quality;

pub use composite::{score as score_composite, CompositeResult};
pub use error::{Error, Result};
pub use fraud::analyze as analyze_fraud;
pub use text_quality::{apply_flags, classify_response, session_text_risk};
