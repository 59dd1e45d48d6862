use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::payload::EventPayload;

/// A single behavioral observation, append-only once written.
///
/// Maps close to 1:1 to a store row; `session_id` must reference an
/// existing session (enforced at the store boundary, not here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub session_id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
    pub element_id: Option<String>,
    pub element_type: Option<String>,
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        self.payload.type_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::payload::KeystrokePayload;

    #[test]
    fn round_trips_through_json() {
        let event = Event {
            session_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload: EventPayload::Keystroke(KeystrokePayload { key_code: Some(65) }),
            element_id: None,
            element_type: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_type(), "keystroke");
    }
}
