use crate::{Error, Result};
use botcheck_core::{Clock, IdGen};
use botcheck_store::Database;
use botcheck_types::{DeviceInfoPayload, Event, EventPayload, GridResponseRow, Session, SurveyQuestion, SurveyResponse};

/// Creates a new session (§3 Session, §4.1 `CreateSession`). Rejects blank
/// hierarchy identifiers rather than persisting a row no hierarchy query
/// could ever reach.
pub fn create_session(
    db: &Database,
    clock: &dyn Clock,
    ids: &dyn IdGen,
    survey_id: &str,
    platform_id: &str,
    respondent_id: &str,
    user_agent: Option<String>,
    ip_address: Option<String>,
) -> Result<Session> {
    for (field, value) in [("survey_id", survey_id), ("platform_id", platform_id), ("respondent_id", respondent_id)] {
        if value.trim().is_empty() {
            return Err(Error::Store(botcheck_types::Error::ValidationFailed(format!("{field} must not be blank"))));
        }
    }

    let session = Session::new(ids.new_id(), survey_id, platform_id, respondent_id, user_agent, ip_address, clock.now());
    db.insert_session(&session)?;
    Ok(session)
}

/// Appends a batch of events to `session_id`, enforcing the event-count cap
/// in one transaction, then derives and persists the device fingerprint
/// from the first `device_info` event seen, if any (§4.4).
///
/// Returns `(accepted_count, total_count)` per §4.1's `AppendEvents`.
pub fn append_events(db: &Database, session_id: uuid::Uuid, events: Vec<Event>, cap: usize) -> Result<(usize, usize)> {
    if let Some(device) = events.iter().find_map(device_info_payload) {
        let session = db.get_session(session_id)?;
        let fingerprint = botcheck_core::device_fingerprint(session.user_agent.as_deref(), Some(device));
        db.set_device_fingerprint(session_id, &fingerprint)?;
    }

    let accepted = db.append_events(session_id, events, cap)?;
    let total = db.event_count(session_id)?;
    Ok((accepted, total))
}

/// Records a question captured for a session (§3 SurveyQuestion). Scoring
/// reads questions back by `session_id` to pair each response with its
/// question text before classification.
pub fn submit_question(db: &Database, question: &SurveyQuestion) -> Result<()> {
    db.insert_question(question)?;
    Ok(())
}

/// Records a raw answer (§3 SurveyResponse). Quality fields are left unset
/// here; the scoring pipeline fills `quality_score`/`flag_reasons` once the
/// `TextClassifier` has run.
pub fn submit_response(db: &Database, response: &SurveyResponse) -> Result<()> {
    db.insert_response(response)?;
    Ok(())
}

/// Records a grid question's raw rows (§3 GridResponseRow). Structural
/// analysis (straight-lining, pattern, variance) is recomputed from these
/// rows at read time rather than persisted (§4.8).
pub fn submit_grid_rows(db: &Database, rows: &[GridResponseRow]) -> Result<()> {
    for row in rows {
        db.insert_grid_row(row)?;
    }
    Ok(())
}

fn device_info_payload(event: &Event) -> Option<&DeviceInfoPayload> {
    match &event.payload {
        EventPayload::DeviceInfo(payload) => Some(payload),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botcheck_core::{RandomIdGen, SystemClock};
    use botcheck_types::{KeystrokePayload, Resolution};

    #[test]
    fn create_session_rejects_blank_hierarchy_fields() {
        let db = Database::open_in_memory().unwrap();
        let err = create_session(&db, &SystemClock, &RandomIdGen, "", "p1", "r1", None, None).unwrap_err();
        assert!(matches!(err, Error::Store(botcheck_types::Error::ValidationFailed(_))));
    }

    #[test]
    fn append_events_derives_fingerprint_from_device_info() {
        let db = Database::open_in_memory().unwrap();
        let session = create_session(&db, &SystemClock, &RandomIdGen, "s1", "p1", "r1", Some("UA".into()), None).unwrap();

        let device_event = Event {
            session_id: session.id,
            timestamp: chrono::Utc::now(),
            payload: EventPayload::DeviceInfo(DeviceInfoPayload {
                screen: Some(Resolution { width: 1920, height: 1080 }),
                viewport: None,
                locale: None,
            }),
            element_id: None,
            element_type: None,
        };
        let (accepted, total) = append_events(&db, session.id, vec![device_event], 10_000).unwrap();
        assert_eq!(accepted, 1);
        assert_eq!(total, 1);

        let fetched = db.get_session(session.id).unwrap();
        assert!(fetched.device_fingerprint.is_some());
    }

    #[test]
    fn append_events_rejects_batch_past_the_cap() {
        let db = Database::open_in_memory().unwrap();
        let session = create_session(&db, &SystemClock, &RandomIdGen, "s1", "p1", "r1", None, None).unwrap();
        let events = vec![
            Event {
                session_id: session.id,
                timestamp: chrono::Utc::now(),
                payload: EventPayload::Keystroke(KeystrokePayload { key_code: Some(65) }),
                element_id: None,
                element_type: None,
            };
            3
        ];
        let err = append_events(&db, session.id, events, 2).unwrap_err();
        assert!(matches!(err, Error::Store(botcheck_types::Error::CapExceeded { .. })));
    }
}
