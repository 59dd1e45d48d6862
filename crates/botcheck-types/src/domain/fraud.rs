use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Reason a fraud sub-score crossed its attach threshold (§4.4), or that
/// a cross-session lookup failed and the component was scored 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudReason {
    IpReuse,
    DeviceReuse,
    DuplicateResponses,
    Geolocation,
    HighVelocity,
    Unavailable,
}

/// Per-session fraud record, with hierarchical fields denormalized for
/// index-only aggregation (§4.8 invariant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudIndicator {
    pub session_id: Uuid,
    pub survey_id: String,
    pub platform_id: String,
    pub respondent_id: String,
    pub overall_fraud_score: f64,
    pub is_duplicate: bool,
    pub ip_score: f64,
    pub device_score: f64,
    pub duplicate_score: f64,
    pub geo_score: f64,
    pub velocity_score: f64,
    /// Reason -> the sub-score that triggered it, for display.
    pub flag_reasons: BTreeMap<FraudReason, f64>,
}
