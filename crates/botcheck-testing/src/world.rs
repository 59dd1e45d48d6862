//! Fluent test setup wiring a `Client` to an in-memory store, a
//! deterministic clock/IdGen, and a chosen classifier, for the §8
//! end-to-end scenarios.

use crate::clock::SteppedClock;
use crate::idgen::SequentialIdGen;
use botcheck_config::Config;
use botcheck_core::TextClassifier;
use botcheck_sdk::Client;
use botcheck_store::Database;
use botcheck_types::{Event, Session};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// A fixed epoch so scenario assertions never depend on wall-clock time.
pub fn epoch() -> DateTime<Utc> {
    "2025-01-01T00:00:00Z".parse().expect("valid RFC3339 literal")
}

pub struct TestWorld {
    pub client: Client,
}

impl TestWorld {
    /// An in-memory store, the default `Config`, a clock starting at
    /// [`epoch`] stepping 1ms per call, and sequential session/event IDs.
    pub fn new(classifier: Arc<dyn TextClassifier>) -> Self {
        Self::with_config(Config::default(), classifier)
    }

    pub fn with_config(config: Config, classifier: Arc<dyn TextClassifier>) -> Self {
        let db = Arc::new(Database::open_in_memory().expect("in-memory store always opens"));
        let clock = Arc::new(SteppedClock::starting_at(epoch(), Duration::milliseconds(1)));
        let ids = Arc::new(SequentialIdGen::default());
        let client = Client::with_clock_and_ids(db, Arc::new(config), classifier, clock, ids);
        Self { client }
    }

    pub fn create_session(&self, survey_id: &str, platform_id: &str, respondent_id: &str) -> Session {
        self.client
            .create_session(survey_id, platform_id, respondent_id, Some("test-agent".to_string()), Some("203.0.113.1".to_string()))
            .expect("session creation should not fail on a blank-validated fixture")
    }

    pub fn append_events(&self, session_id: Uuid, events: Vec<Event>) {
        self.client.append_events(session_id, events).expect("event append should not exceed the default cap in fixtures");
    }
}
