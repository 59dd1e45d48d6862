use crate::{Error, Result};
use botcheck_types::{Event, EventPayload};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

fn from_row(row: &Row) -> rusqlite::Result<Event> {
    let payload_json: String = row.get(2)?;
    let payload: EventPayload = serde_json::from_str(&payload_json).unwrap_or(EventPayload::SessionStart(
        botcheck_types::SessionStartPayload { referrer: None },
    ));
    Ok(Event {
        session_id: row.get::<_, String>(0)?.parse().unwrap_or_else(|_| Uuid::nil()),
        timestamp: row.get::<_, String>(1)?.parse().unwrap_or_else(|_| chrono::Utc::now()),
        payload,
        element_id: row.get(3)?,
        element_type: row.get(4)?,
    })
}

/// Appends `events` to `session_id` inside one transaction, rejecting the
/// whole batch if it would push the session's total past `cap` (§3 Event
/// invariant, §7 CapExceeded).
pub fn append(conn: &mut Connection, session_id: Uuid, events: &[Event], cap: usize) -> Result<usize> {
    let tx = conn.transaction()?;

    let current_count: i64 = tx.query_row(
        "SELECT COUNT(*) FROM events WHERE session_id = ?1",
        params![session_id.to_string()],
        |row| row.get(0),
    )?;

    let new_total = current_count as usize + events.len();
    if new_total > cap {
        return Err(Error::CapExceeded { session_id: session_id.to_string(), cap });
    }

    let mut next_seq: i64 = current_count;
    for event in events {
        let payload_json = serde_json::to_string(&event.payload)
            .map_err(|e| Error::Query(format!("failed to serialize event payload: {e}")))?;
        tx.execute(
            r#"
            INSERT INTO events (session_id, seq, event_type, timestamp, payload, element_id, element_type)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                session_id.to_string(),
                next_seq,
                event.event_type(),
                event.timestamp.to_rfc3339(),
                payload_json,
                event.element_id,
                event.element_type,
            ],
        )?;
        next_seq += 1;
    }

    tx.execute(
        "UPDATE sessions SET updated_at = ?1 WHERE id = ?2",
        params![chrono::Utc::now().to_rfc3339(), session_id.to_string()],
    )?;

    tx.commit()?;
    Ok(events.len())
}

pub fn list_for_session(conn: &Connection, session_id: Uuid) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT session_id, timestamp, payload, element_id, element_type
        FROM events WHERE session_id = ?1 ORDER BY seq
        "#,
    )?;
    let rows = stmt.query_map(params![session_id.to_string()], |row| from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn count_for_session(conn: &Connection, session_id: Uuid) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM events WHERE session_id = ?1",
        params![session_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// Total event count across sessions under a hierarchy scope, for the
/// aggregation service's `events.total`/`avg_per_session` (§4.8).
pub fn count_in_hierarchy(conn: &Connection, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<usize> {
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
        "SELECT COUNT(*) FROM events e JOIN sessions s ON e.session_id = s.id WHERE {}",
        where_clauses.join(" AND ")
    );
    let param_refs: Vec<&dyn rusqlite::ToSql> = query_params.iter().map(|p| p.as_ref()).collect();
    let count: i64 = conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use botcheck_types::{KeystrokePayload, Session};

    fn open_with_session() -> (Connection, Uuid) {
        let mut conn = Connection::open_in_memory().unwrap();
        schema::init(&conn).unwrap();
        let session = Session::new(Uuid::new_v4(), "s1", "p1", "r1", None, None, chrono::Utc::now());
        crate::queries::session::insert(&conn, &session).unwrap();
        (conn, session.id)
    }

    fn keystroke_event(session_id: Uuid) -> Event {
        Event {
            session_id,
            timestamp: chrono::Utc::now(),
            payload: EventPayload::Keystroke(KeystrokePayload { key_code: Some(65) }),
            element_id: None,
            element_type: None,
        }
    }

    #[test]
    fn append_then_list_round_trips() {
        let (mut conn, session_id) = open_with_session();
        let events = vec![keystroke_event(session_id), keystroke_event(session_id)];
        let appended = append(&mut conn, session_id, &events, 10_000).unwrap();
        assert_eq!(appended, 2);
        let listed = list_for_session(&conn, session_id).unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn append_rejects_batch_that_would_exceed_cap() {
        let (mut conn, session_id) = open_with_session();
        let events = vec![keystroke_event(session_id), keystroke_event(session_id)];
        let err = append(&mut conn, session_id, &events, 1).unwrap_err();
        assert!(matches!(err, Error::CapExceeded { .. }));
        assert_eq!(count_for_session(&conn, session_id).unwrap(), 0);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let (mut conn, session_id) = open_with_session();
        let appended = append(&mut conn, session_id, &[], 10_000).unwrap();
        assert_eq!(appended, 0);
        assert_eq!(count_for_session(&conn, session_id).unwrap(), 0);
    }
}
