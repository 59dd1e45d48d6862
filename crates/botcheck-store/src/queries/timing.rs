use crate::Result;
use botcheck_types::TimingAnalysis;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

fn from_row(row: &Row) -> rusqlite::Result<TimingAnalysis> {
    Ok(TimingAnalysis {
        session_id: row.get::<_, String>(0)?.parse().unwrap_or_else(|_| Uuid::nil()),
        question_id: row.get::<_, String>(1)?.parse().unwrap_or_else(|_| Uuid::nil()),
        response_time_ms: row.get::<_, i64>(2)? as u64,
        is_speeder: row.get::<_, i64>(3)? != 0,
        is_flatliner: row.get::<_, i64>(4)? != 0,
        anomaly_z: row.get(5)?,
    })
}

pub fn insert(conn: &Connection, analysis: &TimingAnalysis) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO timing_analyses (session_id, question_id, response_time_ms, is_speeder, is_flatliner, anomaly_z)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(session_id, question_id) DO UPDATE SET
            response_time_ms = ?3, is_speeder = ?4, is_flatliner = ?5, anomaly_z = ?6
        "#,
        params![
            analysis.session_id.to_string(),
            analysis.question_id.to_string(),
            analysis.response_time_ms as i64,
            analysis.is_speeder as i64,
            analysis.is_flatliner as i64,
            analysis.anomaly_z,
        ],
    )?;
    Ok(())
}

pub fn list_for_session(conn: &Connection, session_id: Uuid) -> Result<Vec<TimingAnalysis>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT session_id, question_id, response_time_ms, is_speeder, is_flatliner, anomaly_z
        FROM timing_analyses WHERE session_id = ?1
        "#,
    )?;
    let rows = stmt.query_map(params![session_id.to_string()], |row| from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Response-time history for the same question across the survey, used to
/// derive adaptive mean/stddev for z-score anomalies (§4.6).
pub fn response_times_for_question(conn: &Connection, survey_id: &str, question_id: Uuid) -> Result<Vec<u64>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT t.response_time_ms
        FROM timing_analyses t
        JOIN sessions s ON t.session_id = s.id
        WHERE s.survey_id = ?1 AND t.question_id = ?2
        "#,
    )?;
    let rows = stmt.query_map(params![survey_id, question_id.to_string()], |row| {
        row.get::<_, i64>(0).map(|v| v as u64)
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// All timing analyses under a hierarchy scope, for the aggregation
/// service's timing summary (§4.8, §4.6).
pub fn list_in_hierarchy(conn: &Connection, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<Vec<TimingAnalysis>> {
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
        SELECT t.session_id, t.question_id, t.response_time_ms, t.is_speeder, t.is_flatliner, t.anomaly_z
        FROM timing_analyses t
        JOIN sessions s ON t.session_id = s.id
        WHERE {}
        "#,
        where_clauses.join(" AND ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = query_params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
