//! Builders for the event/session/response shapes used by the §8
//! end-to-end scenarios (clean human, robotic typist, straight-lining
//! respondent, duplicate response, classifier outage, full composite bot).

use botcheck_types::{
    DeviceInfoPayload, Event, EventPayload, GridResponseRow, KeystrokePayload, MouseClickPayload, MouseMovePayload,
    QuestionType, Resolution, SurveyQuestion, SurveyResponse,
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

fn keystroke_event(session_id: Uuid, at: DateTime<Utc>) -> Event {
    Event {
        session_id,
        timestamp: at,
        payload: EventPayload::Keystroke(KeystrokePayload { key_code: Some(65) }),
        element_id: None,
        element_type: None,
    }
}

/// Naturally varied inter-keystroke intervals (ms), scoring low on the
/// robotic-cadence check (mirrors `keystroke::tests::naturally_varied_keystrokes_score_low`).
pub const HUMAN_KEYSTROKE_OFFSETS_MS: [i64; 10] = [0, 180, 410, 560, 790, 1020, 1340, 1510, 1800, 2050];

/// A perfectly even cadence, the signature of a scripted typist.
pub fn robotic_keystrokes(session_id: Uuid, start: DateTime<Utc>, count: usize, interval_ms: i64) -> Vec<Event> {
    (0..count).map(|i| keystroke_event(session_id, start + Duration::milliseconds(i as i64 * interval_ms))).collect()
}

/// A human-paced keystroke burst with natural jitter between keys.
pub fn human_keystrokes(session_id: Uuid, start: DateTime<Utc>) -> Vec<Event> {
    HUMAN_KEYSTROKE_OFFSETS_MS.iter().map(|&offset| keystroke_event(session_id, start + Duration::milliseconds(offset))).collect()
}

/// A straight, uniformly-spaced mouse path from `(0, 0)` toward increasing
/// `x`, the shape the mouse analyzer flags as a scripted trajectory.
pub fn robotic_mouse_path(session_id: Uuid, start: DateTime<Utc>, count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| Event {
            session_id,
            timestamp: start + Duration::milliseconds(i as i64 * 50),
            payload: EventPayload::MouseMove(MouseMovePayload { x: i as f64 * 10.0, y: 0.0 }),
            element_id: None,
            element_type: None,
        })
        .collect()
}

/// A curved, organically varied mouse path.
pub fn human_mouse_path(session_id: Uuid, start: DateTime<Utc>, count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            Event {
                session_id,
                timestamp: start + Duration::milliseconds(i as i64 * 50),
                payload: EventPayload::MouseMove(MouseMovePayload { x: t * 10.0, y: (t * 0.3).sin() * 40.0 }),
                element_id: None,
                element_type: None,
            }
        })
        .collect()
}

/// A perfectly-centered click, the signature of a scripted clicker rather
/// than a human aiming at an on-screen target.
pub fn precise_click(session_id: Uuid, at: DateTime<Utc>, x: f64, y: f64) -> Event {
    Event {
        session_id,
        timestamp: at,
        payload: EventPayload::MouseClick(MouseClickPayload {
            x,
            y,
            target_x_min: Some(x - 1.0),
            target_x_max: Some(x + 1.0),
            target_y_min: Some(y - 1.0),
            target_y_max: Some(y + 1.0),
        }),
        element_id: None,
        element_type: None,
    }
}

pub fn device_info_event(session_id: Uuid, at: DateTime<Utc>, width: u32, height: u32) -> Event {
    Event {
        session_id,
        timestamp: at,
        payload: EventPayload::DeviceInfo(DeviceInfoPayload {
            screen: Some(Resolution { width, height }),
            viewport: Some(Resolution { width, height }),
            locale: Some("en-US".to_string()),
        }),
        element_id: None,
        element_type: None,
    }
}

pub fn open_ended_question(id: Uuid, session_id: Uuid, text: &str, created_at: DateTime<Utc>) -> SurveyQuestion {
    SurveyQuestion {
        id,
        session_id,
        question_text: text.to_string(),
        question_type: QuestionType::OpenEnded,
        element_id: None,
        created_at,
    }
}

pub fn grid_question(id: Uuid, session_id: Uuid, text: &str, created_at: DateTime<Utc>) -> SurveyQuestion {
    SurveyQuestion { question_type: QuestionType::Grid, ..open_ended_question(id, session_id, text, created_at) }
}

pub fn response(id: Uuid, session_id: Uuid, question_id: Uuid, text: &str, response_time_ms: u64) -> SurveyResponse {
    SurveyResponse::new(id, session_id, question_id, text.to_string(), response_time_ms)
}

/// Rows that straight-line a grid question: every row answered identically.
pub fn straight_lined_grid_rows(session_id: Uuid, question_id: Uuid, row_ids: &[&str], value: &str) -> Vec<GridResponseRow> {
    row_ids
        .iter()
        .map(|row_id| GridResponseRow {
            session_id,
            question_id,
            row_id: row_id.to_string(),
            value: value.to_string(),
            response_time_ms: Some(500),
        })
        .collect()
}

/// Rows answered with a varied, non-straight-lined spread.
pub fn varied_grid_rows(session_id: Uuid, question_id: Uuid, row_ids: &[&str], values: &[&str]) -> Vec<GridResponseRow> {
    row_ids
        .iter()
        .zip(values.iter().cycle())
        .map(|(row_id, value)| GridResponseRow {
            session_id,
            question_id,
            row_id: row_id.to_string(),
            value: value.to_string(),
            response_time_ms: Some(1500),
        })
        .collect()
}
