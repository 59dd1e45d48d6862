use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Coarse risk label derived from the composite (or behavioral) score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Default risk bands per §4.7 / §6.4 `risk_bands`: ordered
    /// (composite_ge, level), highest threshold first.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.80 {
            RiskLevel::Critical
        } else if score >= 0.60 {
            RiskLevel::High
        } else if score >= 0.40 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Per-analysis outcome persisted for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub is_bot: bool,
    pub confidence_score: f64,
    pub risk_level: RiskLevel,
    pub method_scores: BTreeMap<String, f64>,
    pub processing_time_ms: u64,
    pub event_count: usize,
    pub composite_score: Option<f64>,
    pub text_quality_score: Option<f64>,
    pub fraud_score: Option<f64>,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_bands_are_monotone_and_non_overlapping() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.399), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.599), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.60), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.799), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.80), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::Critical);
    }
}
