use crate::Result;
use botcheck_types::GridResponseRow;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

fn from_row(row: &Row) -> rusqlite::Result<GridResponseRow> {
    Ok(GridResponseRow {
        session_id: row.get::<_, String>(0)?.parse().unwrap_or_else(|_| Uuid::nil()),
        question_id: row.get::<_, String>(1)?.parse().unwrap_or_else(|_| Uuid::nil()),
        row_id: row.get(2)?,
        value: row.get(3)?,
        response_time_ms: row.get::<_, Option<i64>>(4)?.map(|v| v as u64),
    })
}

pub fn insert(conn: &Connection, row: &GridResponseRow) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO grid_response_rows (session_id, question_id, row_id, value, response_time_ms)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(session_id, question_id, row_id) DO UPDATE SET value = ?4, response_time_ms = ?5
        "#,
        params![
            row.session_id.to_string(),
            row.question_id.to_string(),
            row.row_id,
            row.value,
            row.response_time_ms.map(|v| v as i64),
        ],
    )?;
    Ok(())
}

pub fn list_for_question(conn: &Connection, session_id: Uuid, question_id: Uuid) -> Result<Vec<GridResponseRow>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT session_id, question_id, row_id, value, response_time_ms
        FROM grid_response_rows WHERE session_id = ?1 AND question_id = ?2
        ORDER BY row_id
        "#,
    )?;
    let rows = stmt.query_map(params![session_id.to_string(), question_id.to_string()], |row| from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// All grid rows under a hierarchy scope, grouped downstream by
/// `(session_id, question_id)` for the aggregation service's grid summary
/// (§4.8, §4.5).
pub fn list_in_hierarchy(conn: &Connection, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<Vec<GridResponseRow>> {
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
        SELECT g.session_id, g.question_id, g.row_id, g.value, g.response_time_ms
        FROM grid_response_rows g
        JOIN sessions s ON g.session_id = s.id
        WHERE {}
        ORDER BY g.session_id, g.question_id, g.row_id
        "#,
        where_clauses.join(" AND ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = query_params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
