//! Custom assertions for the scoring engine's domain types, so test
//! failures read as scoring claims rather than raw struct diffs.

use botcheck_types::{DetectionResult, FraudIndicator, RiskLevel};

#[track_caller]
pub fn assert_classified_as_bot(detection: &DetectionResult) {
    assert!(detection.is_bot, "expected session {} to be classified as a bot, got {:#?}", detection.session_id, detection);
}

#[track_caller]
pub fn assert_classified_as_human(detection: &DetectionResult) {
    assert!(!detection.is_bot, "expected session {} to be classified as human, got {:#?}", detection.session_id, detection);
}

#[track_caller]
pub fn assert_risk_at_least(detection: &DetectionResult, minimum: RiskLevel) {
    assert!(
        detection.risk_level >= minimum,
        "expected risk level >= {minimum:?} for session {}, got {:?}",
        detection.session_id,
        detection.risk_level
    );
}

#[track_caller]
pub fn assert_text_quality_unavailable(detection: &DetectionResult) {
    assert!(detection.text_quality_score.is_none(), "expected text quality to be unavailable, got {:?}", detection.text_quality_score);
}

#[track_caller]
pub fn assert_flagged_duplicate(indicator: &FraudIndicator) {
    assert!(indicator.is_duplicate, "expected fraud indicator for session {} to flag duplicate responses, got {:#?}", indicator.session_id, indicator);
}
