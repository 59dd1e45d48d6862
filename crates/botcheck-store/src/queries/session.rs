use crate::{Error, Result};
use botcheck_types::{Session, SessionStatus};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

fn status_str(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Active => "active",
        SessionStatus::Completed => "completed",
        SessionStatus::Expired => "expired",
    }
}

fn parse_status(s: &str) -> Result<SessionStatus> {
    match s {
        "active" => Ok(SessionStatus::Active),
        "completed" => Ok(SessionStatus::Completed),
        "expired" => Ok(SessionStatus::Expired),
        other => Err(Error::Query(format!("unknown session status: {other}"))),
    }
}

fn from_row(row: &Row) -> rusqlite::Result<(Session, String)> {
    let id: String = row.get(0)?;
    let status: String = row.get(6)?;
    let session = Session {
        id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
        survey_id: row.get(1)?,
        platform_id: row.get(2)?,
        respondent_id: row.get(3)?,
        created_at: row.get::<_, String>(4)?.parse().unwrap_or_else(|_| Utc::now()),
        updated_at: row.get::<_, String>(5)?.parse().unwrap_or_else(|_| Utc::now()),
        status: SessionStatus::Active, // overwritten below once parsed fallibly
        user_agent: row.get(7)?,
        ip_address: row.get(8)?,
        device_fingerprint: row.get(9)?,
    };
    Ok((session, status))
}

pub fn insert(conn: &Connection, session: &Session) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO sessions
            (id, survey_id, platform_id, respondent_id, created_at, updated_at, status, user_agent, ip_address, device_fingerprint)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(id) DO UPDATE SET
            updated_at = ?6,
            status = ?7,
            device_fingerprint = COALESCE(?10, device_fingerprint)
        "#,
        params![
            session.id.to_string(),
            session.survey_id,
            session.platform_id,
            session.respondent_id,
            session.created_at.to_rfc3339(),
            session.updated_at.to_rfc3339(),
            status_str(session.status),
            session.user_agent,
            session.ip_address,
            session.device_fingerprint,
        ],
    )?;
    Ok(())
}

pub fn set_device_fingerprint(conn: &Connection, session_id: Uuid, fingerprint: &str) -> Result<()> {
    conn.execute(
        "UPDATE sessions SET device_fingerprint = ?1 WHERE id = ?2",
        params![fingerprint, session_id.to_string()],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, session_id: Uuid) -> Result<Session> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, survey_id, platform_id, respondent_id, created_at, updated_at, status, user_agent, ip_address, device_fingerprint
        FROM sessions WHERE id = ?1
        "#,
    )?;
    let row = stmt
        .query_row(params![session_id.to_string()], |row| from_row(row))
        .optional()?;

    match row {
        Some((mut session, status)) => {
            session.status = parse_status(&status)?;
            Ok(session)
        }
        None => Err(Error::SessionNotFound(session_id.to_string())),
    }
}

pub fn sessions_sharing_ip(
    conn: &Connection,
    survey_id: &str,
    ip_address: &str,
    exclude_session: Uuid,
    _now: DateTime<Utc>,
) -> Result<Vec<Session>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, survey_id, platform_id, respondent_id, created_at, updated_at, status, user_agent, ip_address, device_fingerprint
        FROM sessions
        WHERE survey_id = ?1 AND ip_address = ?2 AND id != ?3
        "#,
    )?;
    let rows = stmt.query_map(
        params![survey_id, ip_address, exclude_session.to_string()],
        |row| from_row(row),
    )?;

    let mut out = Vec::new();
    for row in rows {
        let (mut session, status) = row?;
        session.status = parse_status(&status)?;
        out.push(session);
    }
    Ok(out)
}

pub fn sessions_sharing_fingerprint(
    conn: &Connection,
    survey_id: &str,
    fingerprint: &str,
    exclude_session: Uuid,
) -> Result<Vec<Session>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, survey_id, platform_id, respondent_id, created_at, updated_at, status, user_agent, ip_address, device_fingerprint
        FROM sessions
        WHERE survey_id = ?1 AND device_fingerprint = ?2 AND id != ?3
        "#,
    )?;
    let rows = stmt.query_map(
        params![survey_id, fingerprint, exclude_session.to_string()],
        |row| from_row(row),
    )?;

    let mut out = Vec::new();
    for row in rows {
        let (mut session, status) = row?;
        session.status = parse_status(&status)?;
        out.push(session);
    }
    Ok(out)
}

pub fn list_by_hierarchy(
    conn: &Connection,
    survey_id: &str,
    platform_id: Option<&str>,
    respondent_id: Option<&str>,
) -> Result<Vec<Session>> {
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
        SELECT id, survey_id, platform_id, respondent_id, created_at, updated_at, status, user_agent, ip_address, device_fingerprint
        FROM sessions WHERE {}
        ORDER BY created_at
        "#,
        where_clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = query_params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| from_row(row))?;

    let mut out = Vec::new();
    for row in rows {
        let (mut session, status) = row?;
        session.status = parse_status(&status)?;
        out.push(session);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::init(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_then_get_round_trips() {
        let conn = open();
        let session = Session::new(Uuid::new_v4(), "s1", "p1", "r1", Some("ua".into()), Some("1.1.1.1".into()), Utc::now());
        insert(&conn, &session).unwrap();
        let fetched = get(&conn, session.id).unwrap();
        assert_eq!(fetched.survey_id, "s1");
        assert_eq!(fetched.ip_address.as_deref(), Some("1.1.1.1"));
    }

    #[test]
    fn missing_session_is_an_error() {
        let conn = open();
        let err = get(&conn, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::SessionNotFound(_)));
    }

    #[test]
    fn sharing_ip_excludes_self_and_other_surveys() {
        let conn = open();
        let a = Session::new(Uuid::new_v4(), "s1", "p1", "r1", None, Some("9.9.9.9".into()), Utc::now());
        let b = Session::new(Uuid::new_v4(), "s1", "p1", "r2", None, Some("9.9.9.9".into()), Utc::now());
        let c = Session::new(Uuid::new_v4(), "s2", "p1", "r3", None, Some("9.9.9.9".into()), Utc::now());
        insert(&conn, &a).unwrap();
        insert(&conn, &b).unwrap();
        insert(&conn, &c).unwrap();

        let shared = sessions_sharing_ip(&conn, "s1", "9.9.9.9", a.id, Utc::now()).unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].id, b.id);
    }
}
