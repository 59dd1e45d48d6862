use botcheck_config::Config;
use botcheck_core::{Context, TextClassifier};
use botcheck_types::{FlagReason, Outcome, SurveyQuestion, SurveyResponse, TextClassification};

/// Classifies one response via the `TextClassifier` collaborator (§4.3).
/// Returns `Neutral` if the response doesn't meet `min_response_length_chars`
/// (excluded from analysis, not a failure); `Unavailable` if the classifier
/// call itself failed after retries.
pub async fn classify_response(ctx: &Context, question: &SurveyQuestion, response: &SurveyResponse, cfg: &Config) -> Outcome<TextClassification> {
    if !response.qualifies_for_analysis(cfg.min_response_length_chars) {
        return Outcome::Neutral;
    }
    match ctx.classifier.classify(&question.question_text, &response.response_text).await {
        Ok(classification) => Outcome::Value(classification),
        Err(_) => Outcome::Unavailable,
    }
}

/// Applies the priority-ordered flag rules of §4.3 to `response`, mutating
/// its `quality_score`, `is_flagged`, and `flag_reasons`. Returns the
/// per-response confidence (mean of the four probabilities).
pub fn apply_flags(response: &mut SurveyResponse, classification: &TextClassification) -> f64 {
    response.flag_reasons.clear();
    response.quality_score = Some(classification.quality);

    if classification.p_gibberish > 0.70 {
        response.flag_reasons.insert(FlagReason::Gibberish);
        if classification.p_copy_paste >= 0.70 {
            response.flag_reasons.insert(FlagReason::CopyPaste);
        }
    } else {
        if classification.p_irrelevant >= 0.70 {
            response.flag_reasons.insert(FlagReason::Irrelevant);
        }
        if classification.p_copy_paste >= 0.70 {
            response.flag_reasons.insert(FlagReason::CopyPaste);
        }
        if classification.p_irrelevant < 0.70 && classification.p_generic > 0.70 {
            response.flag_reasons.insert(FlagReason::Generic);
        }
        if classification.quality < 30.0 {
            response.flag_reasons.insert(FlagReason::LowQuality);
        }
    }

    response.is_flagged = !response.flag_reasons.is_empty();
    classification.mean_probability()
}

/// Session text-quality risk (§4.3): `1 - mean(quality) / 100` over
/// responses that carry a `quality_score`. `Unavailable` if none do.
pub fn session_text_risk(responses: &[SurveyResponse]) -> Outcome<f64> {
    let scored: Vec<f64> = responses.iter().filter_map(|r| r.quality_score).collect();
    if scored.is_empty() {
        return Outcome::Unavailable;
    }
    let mean = scored.iter().sum::<f64>() / scored.len() as f64;
    Outcome::Value((1.0 - mean / 100.0).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn response(text: &str) -> SurveyResponse {
        SurveyResponse::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), text.to_string(), 5_000)
    }

    #[test]
    fn gibberish_above_threshold_suppresses_generic_and_low_quality() {
        let mut r = response("asdkjh aslkdj");
        let c = TextClassification { p_gibberish: 0.90, p_copy_paste: 0.0, p_irrelevant: 0.0, p_generic: 0.90, quality: 5.0 };
        apply_flags(&mut r, &c);
        assert!(r.flag_reasons.contains(&FlagReason::Gibberish));
        assert!(!r.flag_reasons.contains(&FlagReason::Generic));
        assert!(!r.flag_reasons.contains(&FlagReason::LowQuality));
    }

    #[test]
    fn irrelevant_above_threshold_suppresses_generic_but_not_copy_paste_check() {
        let mut r = response("totally unrelated answer");
        let c = TextClassification { p_gibberish: 0.0, p_copy_paste: 0.75, p_irrelevant: 0.80, p_generic: 0.90, quality: 50.0 };
        apply_flags(&mut r, &c);
        assert!(r.flag_reasons.contains(&FlagReason::Irrelevant));
        assert!(r.flag_reasons.contains(&FlagReason::CopyPaste));
        assert!(!r.flag_reasons.contains(&FlagReason::Generic));
    }

    #[test]
    fn copy_paste_and_generic_can_both_fire_when_not_gibberish_or_irrelevant() {
        let mut r = response("a reasonable but generic copy-pasted answer");
        let c = TextClassification { p_gibberish: 0.1, p_copy_paste: 0.75, p_irrelevant: 0.1, p_generic: 0.80, quality: 60.0 };
        apply_flags(&mut r, &c);
        assert!(r.flag_reasons.contains(&FlagReason::CopyPaste));
        assert!(r.flag_reasons.contains(&FlagReason::Generic));
    }

    #[test]
    fn low_quality_flag_is_independent_of_the_priority_chain() {
        let mut r = response("ok");
        let c = TextClassification { p_gibberish: 0.0, p_copy_paste: 0.0, p_irrelevant: 0.0, p_generic: 0.0, quality: 10.0 };
        apply_flags(&mut r, &c);
        assert!(r.flag_reasons.contains(&FlagReason::LowQuality));
    }

    #[test]
    fn no_scored_responses_means_session_risk_is_unavailable() {
        let responses = vec![response("short")];
        assert_eq!(session_text_risk(&responses), Outcome::Unavailable);
    }

    #[test]
    fn session_risk_is_one_minus_mean_quality_over_100() {
        let mut a = response("a");
        a.quality_score = Some(80.0);
        let mut b = response("b");
        b.quality_score = Some(40.0);
        let risk = session_text_risk(&[a, b]);
        assert_eq!(risk.value(), Some(0.4));
    }
}
