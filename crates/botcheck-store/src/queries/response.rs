use crate::Result;
use botcheck_types::{FlagReason, SurveyResponse};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;
use uuid::Uuid;

fn reason_str(reason: FlagReason) -> &'static str {
    match reason {
        FlagReason::Gibberish => "gibberish",
        FlagReason::CopyPaste => "copy_paste",
        FlagReason::Irrelevant => "irrelevant",
        FlagReason::Generic => "generic",
        FlagReason::LowQuality => "low_quality",
    }
}

fn parse_reason(s: &str) -> Option<FlagReason> {
    match s {
        "gibberish" => Some(FlagReason::Gibberish),
        "copy_paste" => Some(FlagReason::CopyPaste),
        "irrelevant" => Some(FlagReason::Irrelevant),
        "generic" => Some(FlagReason::Generic),
        "low_quality" => Some(FlagReason::LowQuality),
        _ => None,
    }
}

fn encode_reasons(reasons: &BTreeSet<FlagReason>) -> String {
    let names: Vec<&str> = reasons.iter().copied().map(reason_str).collect();
    serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
}

fn decode_reasons(json: &str) -> BTreeSet<FlagReason> {
    serde_json::from_str::<Vec<String>>(json)
        .unwrap_or_default()
        .iter()
        .filter_map(|s| parse_reason(s))
        .collect()
}

fn from_row(row: &Row) -> rusqlite::Result<SurveyResponse> {
    Ok(SurveyResponse {
        id: row.get::<_, String>(0)?.parse().unwrap_or_else(|_| Uuid::nil()),
        session_id: row.get::<_, String>(1)?.parse().unwrap_or_else(|_| Uuid::nil()),
        question_id: row.get::<_, String>(2)?.parse().unwrap_or_else(|_| Uuid::nil()),
        response_text: row.get(3)?,
        response_time_ms: row.get::<_, i64>(4)? as u64,
        quality_score: row.get(5)?,
        is_flagged: row.get::<_, i64>(6)? != 0,
        flag_reasons: decode_reasons(&row.get::<_, String>(7)?),
    })
}

pub fn insert(conn: &Connection, response: &SurveyResponse) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO survey_responses
            (id, session_id, question_id, response_text, response_time_ms, quality_score, is_flagged, flag_reasons)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(id) DO UPDATE SET
            quality_score = ?6, is_flagged = ?7, flag_reasons = ?8
        "#,
        params![
            response.id.to_string(),
            response.session_id.to_string(),
            response.question_id.to_string(),
            response.response_text,
            response.response_time_ms as i64,
            response.quality_score,
            response.is_flagged as i64,
            encode_reasons(&response.flag_reasons),
        ],
    )?;
    Ok(())
}

pub fn list_for_session(conn: &Connection, session_id: Uuid) -> Result<Vec<SurveyResponse>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, session_id, question_id, response_text, response_time_ms, quality_score, is_flagged, flag_reasons
        FROM survey_responses WHERE session_id = ?1
        "#,
    )?;
    let rows = stmt.query_map(params![session_id.to_string()], |row| from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Other sessions' texts for the same question, for duplicate-text scoring.
pub fn other_texts_for_question(
    conn: &Connection,
    survey_id: &str,
    question_id: Uuid,
    exclude_session: Uuid,
) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT r.response_text
        FROM survey_responses r
        JOIN sessions s ON r.session_id = s.id
        WHERE s.survey_id = ?1 AND r.question_id = ?2 AND r.session_id != ?3
        "#,
    )?;
    let rows = stmt.query_map(
        params![survey_id, question_id.to_string(), exclude_session.to_string()],
        |row| row.get::<_, String>(0),
    )?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Count of responses by sessions matching the respondent, IP, or device
/// fingerprint in the trailing hour ending at `now` (§4.4 velocity).
pub fn responses_in_last_hour(
    conn: &Connection,
    survey_id: &str,
    respondent_id: &str,
    ip_address: Option<&str>,
    fingerprint: Option<&str>,
    now: DateTime<Utc>,
) -> Result<u64> {
    let since = (now - chrono::Duration::hours(1)).to_rfc3339();
    let count: i64 = conn.query_row(
        r#"
        SELECT COUNT(*)
        FROM survey_responses r
        JOIN sessions s ON r.session_id = s.id
        WHERE s.survey_id = ?1
          AND (s.respondent_id = ?2 OR s.ip_address = ?3 OR s.device_fingerprint = ?4)
          AND s.updated_at >= ?5
        "#,
        params![survey_id, respondent_id, ip_address, fingerprint, since],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// All responses under a hierarchy scope, for the aggregation service's
/// text-quality summary (§4.8).
pub fn list_in_hierarchy(conn: &Connection, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<Vec<SurveyResponse>> {
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

    let sql = format!(
        r#"
        SELECT r.id, r.session_id, r.question_id, r.response_text, r.response_time_ms, r.quality_score, r.is_flagged, r.flag_reasons
        FROM survey_responses r
        JOIN sessions s ON r.session_id = s.id
        WHERE {}
        "#,
        where_clauses.join(" AND ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = query_params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
