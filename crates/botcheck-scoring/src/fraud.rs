use crate::error::{Error, Result};
use botcheck_config::Config;
use botcheck_core::{max_pairwise_similarity, Clock, Context, Store};
use botcheck_types::{FraudIndicator, FraudReason, Outcome, Session};
use chrono::{Duration, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// §4.4 discrete IP-reuse mapping.
fn ip_score(total_sharing: usize, sharing_today: usize) -> f64 {
    if total_sharing >= 10 || sharing_today >= 5 {
        0.80
    } else if total_sharing >= 5 || sharing_today >= 3 {
        0.60
    } else if total_sharing >= 3 {
        0.40
    } else if total_sharing == 2 {
        0.20
    } else {
        0.0
    }
}

/// §4.4 discrete device-fingerprint-reuse mapping (distinct respondents
/// other than this session's own respondent).
fn device_score(distinct_respondents_sharing: usize) -> f64 {
    if distinct_respondents_sharing >= 5 {
        0.90
    } else if distinct_respondents_sharing >= 3 {
        0.70
    } else if distinct_respondents_sharing >= 2 {
        0.50
    } else {
        0.0
    }
}

/// §4.4 discrete duplicate-text mapping over max pairwise trigram-Jaccard
/// similarity against other sessions' responses to the same question.
fn duplicate_score(max_similarity: f64) -> f64 {
    if max_similarity >= 0.95 {
        1.00
    } else if max_similarity >= 0.85 {
        0.80
    } else if max_similarity >= 0.70 {
        0.60
    } else {
        0.0
    }
}

/// Runs the five fraud sub-scores for `session` against cross-session
/// history in the Store, and assembles the weighted overall score (§4.4).
///
/// A hard Store error aborts the whole analysis as `Unavailable` (case C of
/// §4.7); an individual lookup returning empty history is not a failure —
/// it legitimately scores that component 0.
pub async fn analyze(ctx: &Context, session: &Session, response_texts_by_question: &BTreeMap<uuid::Uuid, String>, cfg: &Config) -> Outcome<FraudIndicator> {
    match analyze_inner(ctx, session, response_texts_by_question, cfg).await {
        Ok(indicator) => Outcome::Value(indicator),
        Err(_) => Outcome::Unavailable,
    }
}

async fn analyze_inner(
    ctx: &Context,
    session: &Session,
    response_texts_by_question: &BTreeMap<uuid::Uuid, String>,
    cfg: &Config,
) -> Result<FraudIndicator> {
    let now = ctx.clock.now();
    let mut flag_reasons: BTreeMap<FraudReason, f64> = BTreeMap::new();

    let ip_component = match &session.ip_address {
        Some(ip) => {
            let sharing = ctx
                .store
                .sessions_sharing_ip(&session.survey_id, ip, session.id, now)
                .map_err(Error::FraudLookupFailed)?;
            let sharing_today = sharing.iter().filter(|s| now - s.created_at < Duration::hours(24)).count();
            ip_score(sharing.len(), sharing_today)
        }
        None => 0.0,
    };
    if ip_component >= 0.60 {
        flag_reasons.insert(FraudReason::IpReuse, ip_component);
    }

    let device_component = match &session.device_fingerprint {
        Some(fingerprint) => {
            let sharing = ctx
                .store
                .sessions_sharing_fingerprint(&session.survey_id, fingerprint, session.id)
                .map_err(Error::FraudLookupFailed)?;
            let distinct: BTreeSet<&str> = sharing.iter().map(|s| s.respondent_id.as_str()).collect();
            device_score(distinct.len())
        }
        None => 0.0,
    };
    if device_component >= 0.50 {
        flag_reasons.insert(FraudReason::DeviceReuse, device_component);
    }

    let mut max_similarity = 0.0f64;
    for (question_id, text) in response_texts_by_question {
        let others = ctx
            .store
            .other_response_texts(&session.survey_id, *question_id, session.id)
            .map_err(Error::FraudLookupFailed)?;
        let sim = max_pairwise_similarity(text, &others);
        max_similarity = max_similarity.max(sim);
    }
    let duplicate_component = duplicate_score(max_similarity);
    if duplicate_component >= 0.60 {
        flag_reasons.insert(FraudReason::DuplicateResponses, duplicate_component);
    }

    // No geo-IP collaborator is wired into this deployment; the component
    // always reports unavailable per §4.4's failed-lookup semantics.
    let geo_component = 0.0;
    flag_reasons.insert(FraudReason::Unavailable, geo_component);

    let responses_last_hour = ctx
        .store
        .responses_in_last_hour(&session.survey_id, &session.respondent_id, session.ip_address.as_deref(), session.device_fingerprint.as_deref(), now)
        .map_err(Error::FraudLookupFailed)?;
    let velocity_component = cfg.velocity_score_for(responses_last_hour as f64);
    if velocity_component >= 0.60 {
        flag_reasons.insert(FraudReason::HighVelocity, velocity_component);
    }

    let weights = &cfg.fraud_weights;
    let overall = (weights.ip * ip_component
        + weights.device * device_component
        + weights.duplicate * duplicate_component
        + weights.geo * geo_component
        + weights.velocity * velocity_component)
        .clamp(0.0, 1.0);

    Ok(FraudIndicator {
        session_id: session.id,
        survey_id: session.survey_id.clone(),
        platform_id: session.platform_id.clone(),
        respondent_id: session.respondent_id.clone(),
        overall_fraud_score: overall,
        is_duplicate: overall >= 0.70,
        ip_score: ip_component,
        device_score: device_component,
        duplicate_score: duplicate_component,
        geo_score: geo_component,
        velocity_score: velocity_component,
        flag_reasons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_mapping_matches_the_discrete_table() {
        assert_eq!(ip_score(10, 0), 0.80);
        assert_eq!(ip_score(0, 5), 0.80);
        assert_eq!(ip_score(5, 0), 0.60);
        assert_eq!(ip_score(3, 0), 0.40);
        assert_eq!(ip_score(2, 0), 0.20);
        assert_eq!(ip_score(1, 0), 0.0);
        assert_eq!(ip_score(0, 0), 0.0);
    }

    #[test]
    fn device_mapping_matches_the_discrete_table() {
        assert_eq!(device_score(5), 0.90);
        assert_eq!(device_score(3), 0.70);
        assert_eq!(device_score(2), 0.50);
        assert_eq!(device_score(1), 0.0);
    }

    #[test]
    fn duplicate_mapping_matches_the_discrete_table() {
        assert_eq!(duplicate_score(0.95), 1.00);
        assert_eq!(duplicate_score(0.85), 0.80);
        assert_eq!(duplicate_score(0.70), 0.60);
        assert_eq!(duplicate_score(0.50), 0.0);
    }
}
