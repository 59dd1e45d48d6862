use crate::{Error, Result};
use botcheck_types::{DetectionResult, RiskLevel};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use uuid::Uuid;

fn risk_str(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "low",
        RiskLevel::Medium => "medium",
        RiskLevel::High => "high",
        RiskLevel::Critical => "critical",
    }
}

fn parse_risk(s: &str) -> Result<RiskLevel> {
    match s {
        "low" => Ok(RiskLevel::Low),
        "medium" => Ok(RiskLevel::Medium),
        "high" => Ok(RiskLevel::High),
        "critical" => Ok(RiskLevel::Critical),
        other => Err(Error::Query(format!("unknown risk level: {other}"))),
    }
}

fn from_row(row: &Row) -> rusqlite::Result<(DetectionResult, String)> {
    let method_scores_json: String = row.get(5)?;
    let method_scores: BTreeMap<String, f64> = serde_json::from_str(&method_scores_json).unwrap_or_default();
    let risk: String = row.get(4)?;
    let result = DetectionResult {
        session_id: row.get::<_, String>(0)?.parse().unwrap_or_else(|_| Uuid::nil()),
        created_at: row.get::<_, String>(1)?.parse().unwrap_or_else(|_| Utc::now()),
        is_bot: row.get::<_, i64>(2)? != 0,
        confidence_score: row.get(3)?,
        risk_level: RiskLevel::Low, // overwritten by caller once parsed fallibly
        method_scores,
        processing_time_ms: row.get::<_, i64>(6)? as u64,
        event_count: row.get::<_, i64>(7)? as usize,
        composite_score: row.get(8)?,
        text_quality_score: row.get(9)?,
        fraud_score: row.get(10)?,
        summary: row.get(11)?,
    };
    Ok((result, risk))
}

/// Idempotent upsert keyed by `(session_id, created_at)` (§7 Conflict).
pub fn upsert(conn: &Connection, result: &DetectionResult) -> Result<()> {
    let method_scores_json = serde_json::to_string(&result.method_scores)
        .map_err(|e| Error::Query(format!("failed to serialize method_scores: {e}")))?;

    conn.execute(
        r#"
        INSERT INTO detection_results
            (session_id, created_at, is_bot, confidence_score, risk_level, method_scores,
             processing_time_ms, event_count, composite_score, text_quality_score, fraud_score, summary)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        ON CONFLICT(session_id, created_at) DO UPDATE SET
            is_bot = ?3, confidence_score = ?4, risk_level = ?5, method_scores = ?6,
            processing_time_ms = ?7, event_count = ?8, composite_score = ?9,
            text_quality_score = ?10, fraud_score = ?11, summary = ?12
        "#,
        params![
            result.session_id.to_string(),
            result.created_at.to_rfc3339(),
            result.is_bot as i64,
            result.confidence_score,
            risk_str(result.risk_level),
            method_scores_json,
            result.processing_time_ms as i64,
            result.event_count as i64,
            result.composite_score,
            result.text_quality_score,
            result.fraud_score,
            result.summary,
        ],
    )?;
    Ok(())
}

pub fn latest_for_session(conn: &Connection, session_id: Uuid) -> Result<Option<DetectionResult>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT session_id, created_at, is_bot, confidence_score, risk_level, method_scores,
               processing_time_ms, event_count, composite_score, text_quality_score, fraud_score, summary
        FROM detection_results WHERE session_id = ?1
        ORDER BY created_at DESC LIMIT 1
        "#,
    )?;
    let row = stmt.query_row(params![session_id.to_string()], |row| from_row(row)).optional()?;
    match row {
        Some((mut result, risk)) => {
            result.risk_level = parse_risk(&risk)?;
            Ok(Some(result))
        }
        None => Ok(None),
    }
}

/// All detection results for sessions under a hierarchy scope within the
/// optional `[since, until)` window, used by the aggregation service.
pub fn list_by_hierarchy(
    conn: &Connection,
    survey_id: &str,
    platform_id: Option<&str>,
    respondent_id: Option<&str>,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> Result<Vec<DetectionResult>> {
    let mut where_clauses = vec!["s.survey_id = ?1".to_string()];
    let mut query_params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(survey_id.to_string())];

    if let Some(platform) = platform_id {
        where_clauses.push(format!("s.platform_id = ?{}", query_params.len() + 1));
        query_params.push(Box::new(platform.to_string()));
    }
    if let Some(respondent) = respondent_id {
        where_clauses.push(format!("s.respondent_id = ?{}", query_params.len() + 1));
        query_params.push(Box::new(respondent.to_string()));
    }
    if let Some(since) = since {
        where_clauses.push(format!("d.created_at >= ?{}", query_params.len() + 1));
        query_params.push(Box::new(since.to_rfc3339()));
    }
    if let Some(until) = until {
        where_clauses.push(format!("d.created_at < ?{}", query_params.len() + 1));
        query_params.push(Box::new(until.to_rfc3339()));
    }

    let sql = format!(
        r#"
        SELECT d.session_id, d.created_at, d.is_bot, d.confidence_score, d.risk_level, d.method_scores,
               d.processing_time_ms, d.event_count, d.composite_score, d.text_quality_score, d.fraud_score, d.summary
        FROM detection_results d
        JOIN sessions s ON d.session_id = s.id
        WHERE {}
        ORDER BY d.created_at DESC
        "#,
        where_clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = query_params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| from_row(row))?;

    let mut out = Vec::new();
    for row in rows {
        let (mut result, risk) = row?;
        result.risk_level = parse_risk(&risk)?;
        out.push(result);
    }
    Ok(out)
}
