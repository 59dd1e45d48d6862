use botcheck_config::Config;
use botcheck_types::{Outcome, RiskLevel};

/// §4.7 CompositeScorer result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeResult {
    pub composite_score: Option<f64>,
    pub is_bot: bool,
    pub confidence: f64,
    pub risk_level: RiskLevel,
}

/// Blends behavioral confidence with the (optionally unavailable) text-risk
/// and fraud scores per §4.7's cases A-D, then derives the bot decision and
/// risk level.
pub fn score(behavioral_confidence: f64, text_risk: Outcome<f64>, fraud: Outcome<f64>, cfg: &Config) -> CompositeResult {
    let text = text_risk.value();
    let fraud = fraud.value();

    let (composite, is_bot_threshold) = match (text, fraud) {
        (Some(t), Some(f)) => {
            let w = &cfg.composite_weights;
            (Some(w.behavioral * behavioral_confidence + w.text * t + w.fraud * f), cfg.composite_bot_threshold)
        }
        (None, Some(f)) => (Some(0.50 * behavioral_confidence + 0.50 * f), cfg.composite_bot_threshold),
        (Some(t), None) => (Some(0.60 * behavioral_confidence + 0.40 * t), cfg.composite_bot_threshold),
        (None, None) => (None, cfg.composite_bot_threshold),
    };

    match composite {
        Some(score) => {
            let is_bot = score >= is_bot_threshold;
            let mut risk_level = cfg.risk_level_for(score);
            if !is_bot && (1.0 - score) < 0.50 {
                risk_level = risk_level.max(RiskLevel::High);
            }
            CompositeResult { composite_score: Some(score), is_bot, confidence: score, risk_level }
        }
        None => {
            // §9 open question: behavioral-only decision uses a strictly
            // stricter cutoff (`> 0.70`) than the composite's `>= 0.70`.
            let is_bot = behavioral_confidence > cfg.composite_bot_threshold;
            let human_confidence = 1.0 - behavioral_confidence;
            let mut risk_level = cfg.risk_level_for(behavioral_confidence);
            if !is_bot && human_confidence < 0.50 {
                risk_level = risk_level.max(RiskLevel::High);
            }
            CompositeResult { composite_score: None, is_bot, confidence: behavioral_confidence, risk_level }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_a_blends_all_three_components() {
        let cfg = Config::default();
        let result = score(0.80, Outcome::Value(0.60), Outcome::Value(0.50), &cfg);
        let expected = 0.40 * 0.80 + 0.30 * 0.60 + 0.30 * 0.50;
        assert!((result.composite_score.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn case_b_falls_back_to_behavioral_and_fraud_when_text_is_unavailable() {
        let cfg = Config::default();
        let result = score(0.80, Outcome::Unavailable, Outcome::Value(0.60), &cfg);
        let expected = 0.50 * 0.80 + 0.50 * 0.60;
        assert!((result.composite_score.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn case_c_falls_back_to_behavioral_and_text_when_fraud_is_unavailable() {
        let cfg = Config::default();
        let result = score(0.80, Outcome::Value(0.60), Outcome::Unavailable, &cfg);
        let expected = 0.60 * 0.80 + 0.40 * 0.60;
        assert!((result.composite_score.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn case_d_is_behavioral_only_and_uses_the_strict_cutoff() {
        let cfg = Config::default();
        let result = score(0.70, Outcome::Unavailable, Outcome::Unavailable, &cfg);
        assert_eq!(result.composite_score, None);
        assert!(!result.is_bot); // 0.70 is not > 0.70
    }

    #[test]
    fn composite_bot_decision_uses_the_inclusive_cutoff() {
        let cfg = Config::default();
        let result = score(0.70, Outcome::Value(0.70), Outcome::Value(0.70), &cfg);
        assert!(result.is_bot); // composite == 0.70 is >= 0.70
    }

    #[test]
    fn low_confidence_human_classification_is_raised_to_high_risk() {
        let cfg = Config::default();
        // composite well below bot threshold and below 0.50 -> human, but
        // human-confidence (1 - 0.45 = 0.55) is not low enough to raise risk.
        let not_raised = score(0.20, Outcome::Value(0.50), Outcome::Value(0.30), &cfg);
        assert!(!not_raised.is_bot);

        // composite near 0.55 -> human_confidence = 0.45 < 0.50, raised to HIGH
        let raised = score(0.55, Outcome::Value(0.55), Outcome::Value(0.55), &cfg);
        assert!(!raised.is_bot);
        assert_eq!(raised.risk_level, RiskLevel::High);
    }
}
