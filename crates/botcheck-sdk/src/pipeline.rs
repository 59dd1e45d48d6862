use crate::Result;
use botcheck_analyzers::{analyze_behavioral, analyze_response_timing};
use botcheck_core::Context;
use botcheck_store::Database;
use botcheck_types::{DetectionResult, Outcome};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Runs the full per-session pipeline (§4.2-§4.7): behavioral analyzers,
/// text-quality classification, cross-session fraud, per-question timing,
/// and the composite decision, persisting everything it derives.
///
/// Grid analysis is intentionally not persisted here: only raw
/// `GridResponseRow`s are stored, and `botcheck-aggregation` recomputes
/// `GridAnalysis` from them on read (§4.8), so there is no
/// `GridAnalysisResult` row for this pipeline to write.
pub async fn score_session(ctx: &Context, db: &Database, session_id: Uuid) -> Result<DetectionResult> {
    let started = ctx.clock.now();

    let session = db.get_session(session_id)?;
    let events = db.list_events(session_id)?;
    let questions = db.list_questions(session_id)?;
    let mut responses = db.list_responses(session_id)?;

    let behavioral = analyze_behavioral(&events, &ctx.cfg);

    let questions_by_id: HashMap<Uuid, _> = questions.iter().map(|q| (q.id, q)).collect();
    for response in &mut responses {
        let Some(question) = questions_by_id.get(&response.question_id).copied() else { continue };
        if let Outcome::Value(classification) = botcheck_scoring::classify_response(ctx, question, &*response, &ctx.cfg).await {
            botcheck_scoring::apply_flags(response, &classification);
        }
        db.insert_response(response)?;

        let prior = db.response_times_for_question(&session.survey_id, response.question_id)?;
        let timing = analyze_response_timing(session_id, response.question_id, response.response_time_ms, &prior, &ctx.cfg.response_timing);
        db.insert_timing_analysis(&timing)?;
    }
    let text_risk = botcheck_scoring::session_text_risk(&responses);

    let response_texts_by_question: BTreeMap<Uuid, String> =
        responses.iter().map(|r| (r.question_id, r.response_text.clone())).collect();
    let fraud_outcome = botcheck_scoring::analyze_fraud(ctx, &session, &response_texts_by_question, &ctx.cfg).await;
    let (fraud_score, fraud_indicator) = match &fraud_outcome {
        Outcome::Value(indicator) => (Outcome::Value(indicator.overall_fraud_score), Some(indicator.clone())),
        Outcome::Neutral => (Outcome::Neutral, None),
        Outcome::Unavailable => (Outcome::Unavailable, None),
    };
    if let Some(indicator) = &fraud_indicator {
        db.upsert_fraud_indicator(indicator)?;
    }

    let composite = botcheck_scoring::score_composite(behavioral.confidence, text_risk, fraud_score, &ctx.cfg);

    let summary = format!(
        "behavioral={:.2} text={} fraud={} composite={}",
        behavioral.confidence,
        text_risk.value().map(|v| format!("{v:.2}")).unwrap_or_else(|| "n/a".into()),
        fraud_score.value().map(|v| format!("{v:.2}")).unwrap_or_else(|| "n/a".into()),
        composite.composite_score.map(|v| format!("{v:.2}")).unwrap_or_else(|| "n/a".into()),
    );

    let processing_time_ms = (ctx.clock.now() - started).num_milliseconds().max(0) as u64;
    let detection = DetectionResult {
        session_id,
        created_at: ctx.clock.now(),
        is_bot: composite.is_bot,
        confidence_score: composite.confidence,
        risk_level: composite.risk_level,
        method_scores: behavioral.method_scores(),
        processing_time_ms,
        event_count: events.len(),
        composite_score: composite.composite_score,
        text_quality_score: text_risk.value(),
        fraud_score: fraud_score.value(),
        summary,
    };
    db.upsert_detection_result(&detection)?;

    Ok(detection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use botcheck_config::Config;
    use botcheck_core::{RandomIdGen, SystemClock};
    use botcheck_providers::StubClassifier;
    use std::sync::Arc;

    fn ctx(db: Arc<Database>) -> Context {
        Context::new(Arc::new(SystemClock), Arc::new(RandomIdGen), Arc::new(Config::default()), Arc::new(StubClassifier::heuristic()), db)
    }

    #[tokio::test]
    async fn scores_a_session_with_no_events_or_responses_as_neutral_behavioral() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let session = crate::ingest::create_session(&db, &SystemClock, &RandomIdGen, "s1", "p1", "r1", None, None).unwrap();

        let context = ctx(db.clone());
        let detection = score_session(&context, &db, session.id).await.unwrap();
        assert_eq!(detection.event_count, 0);
        assert_eq!(detection.composite_score, None);
        assert!(!detection.is_bot);
    }
}
