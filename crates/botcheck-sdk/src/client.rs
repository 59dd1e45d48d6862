use crate::reads::HierarchicalReader;
use crate::{ingest, pipeline, Result};
use botcheck_config::Config;
use botcheck_core::{Clock, Context, IdGen, RandomIdGen, Store, SystemClock, TextClassifier};
use botcheck_store::Database;
use botcheck_types::{DetectionResult, Event, GridResponseRow, Session, SurveyQuestion, SurveyResponse};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

/// Ties `Ingest`, the analyzers, `FraudAnalyzer`, `CompositeScorer`, and
/// `AggregationService` together behind one handle (§9). Holds the
/// concrete `Database` directly (for ingest writes and the index-only
/// aggregation reads) alongside the abstract `Context` the scoring
/// orchestration is written against.
pub struct Client {
    db: Arc<Database>,
    ctx: Context,
    scoring_locks: AsyncMutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl Client {
    pub fn new(db: Arc<Database>, cfg: Arc<Config>, classifier: Arc<dyn TextClassifier>) -> Self {
        Self::with_clock_and_ids(db, cfg, classifier, Arc::new(SystemClock), Arc::new(RandomIdGen))
    }

    /// For tests: substitutes the injectable clock/IDGen (§4.9) so fixtures
    /// are reproducible.
    pub fn with_clock_and_ids(db: Arc<Database>, cfg: Arc<Config>, classifier: Arc<dyn TextClassifier>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGen>) -> Self {
        let store: Arc<dyn Store> = db.clone();
        let ctx = Context::new(clock, ids, cfg, classifier, store);
        Self { db, ctx, scoring_locks: AsyncMutex::new(HashMap::new()) }
    }

    pub fn create_session(
        &self,
        survey_id: &str,
        platform_id: &str,
        respondent_id: &str,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> Result<Session> {
        ingest::create_session(&self.db, self.ctx.clock.as_ref(), self.ctx.ids.as_ref(), survey_id, platform_id, respondent_id, user_agent, ip_address)
    }

    pub fn append_events(&self, session_id: Uuid, events: Vec<Event>) -> Result<(usize, usize)> {
        ingest::append_events(&self.db, session_id, events, self.ctx.cfg.event_count_cap)
    }

    pub fn submit_question(&self, question: &SurveyQuestion) -> Result<()> {
        ingest::submit_question(&self.db, question)
    }

    pub fn submit_response(&self, response: &SurveyResponse) -> Result<()> {
        ingest::submit_response(&self.db, response)
    }

    pub fn submit_grid_rows(&self, rows: &[GridResponseRow]) -> Result<()> {
        ingest::submit_grid_rows(&self.db, rows)
    }

    /// Serializes concurrent scoring of the same session (§5): a caller that
    /// arrives while another is already scoring `session_id` blocks on the
    /// in-flight run rather than starting a duplicate one, and picks up its
    /// result if it lands after the caller's own request time.
    pub async fn score_session(&self, session_id: Uuid) -> Result<DetectionResult> {
        let requested_at = self.ctx.clock.now();
        let lock = self.session_scoring_lock(session_id).await;
        let _guard = lock.lock().await;

        if let Some(existing) = self.db.latest_detection_result(session_id)? {
            if existing.created_at >= requested_at {
                return Ok(existing);
            }
        }

        pipeline::score_session(&self.ctx, &self.db, session_id).await
    }

    async fn session_scoring_lock(&self, session_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self.scoring_locks.lock().await;
        locks.entry(session_id).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
    }

    pub fn reader(&self) -> HierarchicalReader<'_> {
        HierarchicalReader::new(&self.db)
    }

    pub fn config(&self) -> &Config {
        &self.ctx.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botcheck_providers::StubClassifier;
    use botcheck_types::{EventPayload, KeystrokePayload};

    #[tokio::test]
    async fn ingest_then_score_round_trips_through_the_client() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let client = Client::new(db, Arc::new(Config::default()), Arc::new(StubClassifier::heuristic()));

        let session = client.create_session("s1", "p1", "r1", Some("UA".into()), Some("1.2.3.4".into())).unwrap();

        let events: Vec<Event> = (0..5)
            .map(|i| Event {
                session_id: session.id,
                timestamp: chrono::Utc::now() + chrono::Duration::milliseconds(i * 20),
                payload: EventPayload::Keystroke(KeystrokePayload { key_code: Some(65) }),
                element_id: None,
                element_type: None,
            })
            .collect();
        let (accepted, total) = client.append_events(session.id, events).unwrap();
        assert_eq!(accepted, 5);
        assert_eq!(total, 5);

        let detection = client.score_session(session.id).await.unwrap();
        assert_eq!(detection.event_count, 5);

        let fetched = client.reader().detail(session.id).unwrap();
        assert_eq!(fetched.0.id, session.id);
        assert!(fetched.1.is_some());
    }

    struct SteppingClock(std::sync::Mutex<chrono::DateTime<chrono::Utc>>);

    impl Clock for SteppingClock {
        fn now(&self) -> chrono::DateTime<chrono::Utc> {
            let mut current = self.0.lock().unwrap();
            let value = *current;
            *current += chrono::Duration::milliseconds(1);
            value
        }
    }

    #[tokio::test]
    async fn a_second_score_call_after_the_first_completed_reruns_rather_than_reusing_a_stale_result() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let clock: Arc<dyn Clock> = Arc::new(SteppingClock(std::sync::Mutex::new(chrono::Utc::now())));
        let client = Client::with_clock_and_ids(db, Arc::new(Config::default()), Arc::new(StubClassifier::heuristic()), clock, Arc::new(RandomIdGen));

        let session = client.create_session("s1", "p1", "r1", None, None).unwrap();
        let first = client.score_session(session.id).await.unwrap();
        let second = client.score_session(session.id).await.unwrap();

        assert!(second.created_at > first.created_at, "a later call should produce a newer result, not reuse the first one");
    }
}
