use crate::scope::DateRange;
use botcheck_types::{FraudReason, RiskLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rounds to 1 decimal per §4.8's invariant; `0.0` for an empty denominator.
pub(crate) fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((count as f64 / total as f64) * 1000.0).round() / 10.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotDetectionSummary {
    pub total_detections: usize,
    pub bot_count: usize,
    pub human_count: usize,
    pub bot_rate: f64,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextQualitySummary {
    pub total_responses: usize,
    pub avg_quality_score: f64,
    pub flagged_count: usize,
    pub flagged_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FraudSummary {
    pub total_indicators: usize,
    pub duplicate_count: usize,
    pub duplicate_percentage: f64,
    pub avg_fraud_score: f64,
    pub reason_distribution: BTreeMap<FraudReason, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub total_analyzed: usize,
    pub straight_lined_count: usize,
    pub straight_lined_percentage: f64,
    pub pattern_distribution: BTreeMap<String, usize>,
    pub avg_variance_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub total_analyses: usize,
    pub speeder_count: usize,
    pub speeder_percentage: f64,
    pub flatliner_count: usize,
    pub flatliner_percentage: f64,
    pub anomaly_count: usize,
    pub anomaly_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventsSummary {
    pub total: usize,
    pub avg_per_session: f64,
}

/// Rolled-up view at any of the four hierarchy levels (§4.8). The
/// identifying fields narrow as the level narrows; a `SurveySummary` leaves
/// `platform_id`/`respondent_id` `None` and additionally carries
/// `total_platforms`/`platform_distribution`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchySummary {
    pub survey_id: String,
    pub platform_id: Option<String>,
    pub respondent_id: Option<String>,
    pub total_sessions: usize,
    pub total_respondents: usize,
    pub total_platforms: usize,
    pub platform_distribution: BTreeMap<String, usize>,
    pub bot_detection: BotDetectionSummary,
    pub risk_distribution: BTreeMap<RiskLevel, usize>,
    pub events: EventsSummary,
    pub text_quality: TextQualitySummary,
    pub fraud: FraudSummary,
    pub grid: GridSummary,
    pub timing: TimingSummary,
    pub date_range: DateRangeView,
}

/// Serializable mirror of `DateRange` (avoids leaking `chrono` optionals
/// straight into the wire shape).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRangeView {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl From<DateRange> for DateRangeView {
    fn from(range: DateRange) -> Self {
        Self {
            date_from: range.from.map(|d| d.to_rfc3339()),
            date_to: range.to.map(|d| d.to_rfc3339()),
        }
    }
}
