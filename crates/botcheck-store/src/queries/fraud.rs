use crate::Result;
use botcheck_types::{FraudIndicator, FraudReason};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use uuid::Uuid;

fn reason_str(reason: FraudReason) -> &'static str {
    match reason {
        FraudReason::IpReuse => "ip_reuse",
        FraudReason::DeviceReuse => "device_reuse",
        FraudReason::DuplicateResponses => "duplicate_responses",
        FraudReason::Geolocation => "geolocation",
        FraudReason::HighVelocity => "high_velocity",
        FraudReason::Unavailable => "unavailable",
    }
}

fn parse_reason(s: &str) -> Option<FraudReason> {
    match s {
        "ip_reuse" => Some(FraudReason::IpReuse),
        "device_reuse" => Some(FraudReason::DeviceReuse),
        "duplicate_responses" => Some(FraudReason::DuplicateResponses),
        "geolocation" => Some(FraudReason::Geolocation),
        "high_velocity" => Some(FraudReason::HighVelocity),
        "unavailable" => Some(FraudReason::Unavailable),
        _ => None,
    }
}

fn encode_reasons(reasons: &BTreeMap<FraudReason, f64>) -> String {
    let map: BTreeMap<&str, f64> = reasons.iter().map(|(k, v)| (reason_str(*k), *v)).collect();
    serde_json::to_string(&map).unwrap_or_else(|_| "{}".to_string())
}

fn decode_reasons(json: &str) -> BTreeMap<FraudReason, f64> {
    serde_json::from_str::<BTreeMap<String, f64>>(json)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| parse_reason(&k).map(|r| (r, v)))
        .collect()
}

fn from_row(row: &Row) -> rusqlite::Result<FraudIndicator> {
    Ok(FraudIndicator {
        session_id: row.get::<_, String>(0)?.parse().unwrap_or_else(|_| Uuid::nil()),
        survey_id: row.get(1)?,
        platform_id: row.get(2)?,
        respondent_id: row.get(3)?,
        overall_fraud_score: row.get(4)?,
        is_duplicate: row.get::<_, i64>(5)? != 0,
        ip_score: row.get(6)?,
        device_score: row.get(7)?,
        duplicate_score: row.get(8)?,
        geo_score: row.get(9)?,
        velocity_score: row.get(10)?,
        flag_reasons: decode_reasons(&row.get::<_, String>(11)?),
    })
}

pub fn upsert(conn: &Connection, indicator: &FraudIndicator) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO fraud_indicators
            (session_id, survey_id, platform_id, respondent_id, overall_fraud_score, is_duplicate,
             ip_score, device_score, duplicate_score, geo_score, velocity_score, flag_reasons)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        ON CONFLICT(session_id) DO UPDATE SET
            overall_fraud_score = ?5, is_duplicate = ?6, ip_score = ?7, device_score = ?8,
            duplicate_score = ?9, geo_score = ?10, velocity_score = ?11, flag_reasons = ?12
        "#,
        params![
            indicator.session_id.to_string(),
            indicator.survey_id,
            indicator.platform_id,
            indicator.respondent_id,
            indicator.overall_fraud_score,
            indicator.is_duplicate as i64,
            indicator.ip_score,
            indicator.device_score,
            indicator.duplicate_score,
            indicator.geo_score,
            indicator.velocity_score,
            encode_reasons(&indicator.flag_reasons),
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, session_id: Uuid) -> Result<Option<FraudIndicator>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT session_id, survey_id, platform_id, respondent_id, overall_fraud_score, is_duplicate,
               ip_score, device_score, duplicate_score, geo_score, velocity_score, flag_reasons
        FROM fraud_indicators WHERE session_id = ?1
        "#,
    )?;
    Ok(stmt.query_row(params![session_id.to_string()], |row| from_row(row)).optional()?)
}

pub fn list_by_hierarchy(
    conn: &Connection,
    survey_id: &str,
    platform_id: Option<&str>,
    respondent_id: Option<&str>,
) -> Result<Vec<FraudIndicator>> {
    let mut where_clauses = vec!["survey_id = ?1".to_string()];
    let mut query_params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(survey_id.to_string())];

    if let Some(platform) = platform_id {
        where_clauses.push(format!("platform_id = ?{}", query_params.len() + 1));
        query_params.push(Box::new(platform.to_string()));
    }
    if let Some(respondent) = respondent_id {
        where_clauses.push(format!("respondent_id = ?{}", query_params.len() + 1));
        query_params.push(Box::new(respondent.to_string()));
    }

    let sql = format!(
        r#"
        SELECT session_id, survey_id, platform_id, respondent_id, overall_fraud_score, is_duplicate,
               ip_score, device_score, duplicate_score, geo_score, velocity_score, flag_reasons
        FROM fraud_indicators WHERE {}
        "#,
        where_clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = query_params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
