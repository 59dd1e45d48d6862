use crate::{queries, schema, Error, Result};
use botcheck_types::{DetectionResult, Event, FraudIndicator, GridResponseRow, Session, SurveyQuestion, SurveyResponse, TimingAnalysis};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// Durable sqlite-backed store. Wraps the connection in a mutex since
/// `rusqlite::Connection` is `!Sync`; a single writer is sufficient for the
/// scoring engine's workload (append-then-score, not high-concurrency OLTP).
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        schema::init(&conn)
    }

    pub fn insert_session(&self, session: &Session) -> Result<()> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::session::insert(&conn, session)
    }

    pub fn set_device_fingerprint(&self, session_id: Uuid, fingerprint: &str) -> Result<()> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::session::set_device_fingerprint(&conn, session_id, fingerprint)
    }

    pub fn get_session(&self, session_id: Uuid) -> Result<Session> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::session::get(&conn, session_id)
    }

    pub fn list_sessions_by_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
    ) -> Result<Vec<Session>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::session::list_by_hierarchy(&conn, survey_id, platform_id, respondent_id)
    }

    pub fn append_events(&self, session_id: Uuid, events: Vec<Event>, cap: usize) -> Result<usize> {
        let mut conn = self.conn.lock().expect("store mutex poisoned");
        queries::event::append(&mut conn, session_id, &events, cap)
    }

    pub fn list_events(&self, session_id: Uuid) -> Result<Vec<Event>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::event::list_for_session(&conn, session_id)
    }

    pub fn event_count(&self, session_id: Uuid) -> Result<usize> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::event::count_for_session(&conn, session_id)
    }

    pub fn insert_question(&self, question: &SurveyQuestion) -> Result<()> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::question::insert(&conn, question)
    }

    pub fn list_questions(&self, session_id: Uuid) -> Result<Vec<SurveyQuestion>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::question::list_for_session(&conn, session_id)
    }

    pub fn insert_response(&self, response: &SurveyResponse) -> Result<()> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::response::insert(&conn, response)
    }

    pub fn list_responses(&self, session_id: Uuid) -> Result<Vec<SurveyResponse>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::response::list_for_session(&conn, session_id)
    }

    pub fn insert_grid_row(&self, row: &GridResponseRow) -> Result<()> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::grid::insert(&conn, row)
    }

    pub fn list_grid_rows(&self, session_id: Uuid, question_id: Uuid) -> Result<Vec<GridResponseRow>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::grid::list_for_question(&conn, session_id, question_id)
    }

    pub fn insert_timing_analysis(&self, analysis: &TimingAnalysis) -> Result<()> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::timing::insert(&conn, analysis)
    }

    pub fn list_timing_analyses(&self, session_id: Uuid) -> Result<Vec<TimingAnalysis>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::timing::list_for_session(&conn, session_id)
    }

    pub fn response_times_for_question(&self, survey_id: &str, question_id: Uuid) -> Result<Vec<u64>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::timing::response_times_for_question(&conn, survey_id, question_id)
    }

    pub fn upsert_fraud_indicator(&self, indicator: &FraudIndicator) -> Result<()> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::fraud::upsert(&conn, indicator)
    }

    pub fn get_fraud_indicator(&self, session_id: Uuid) -> Result<Option<FraudIndicator>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::fraud::get(&conn, session_id)
    }

    pub fn list_fraud_indicators_by_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
    ) -> Result<Vec<FraudIndicator>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::fraud::list_by_hierarchy(&conn, survey_id, platform_id, respondent_id)
    }

    pub fn upsert_detection_result(&self, result: &DetectionResult) -> Result<()> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::detection::upsert(&conn, result)
    }

    pub fn latest_detection_result(&self, session_id: Uuid) -> Result<Option<DetectionResult>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::detection::latest_for_session(&conn, session_id)
    }

    pub fn list_detection_results_by_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<DetectionResult>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::detection::list_by_hierarchy(&conn, survey_id, platform_id, respondent_id, since, until)
    }
}

impl botcheck_core::Store for Database {
    fn append_events(&self, session_id: Uuid, events: Vec<Event>, cap: usize) -> botcheck_types::Result<usize> {
        Database::append_events(self, session_id, events, cap).map_err(Into::into)
    }

    fn get_session(&self, session_id: Uuid) -> botcheck_types::Result<Session> {
        Database::get_session(self, session_id).map_err(Into::into)
    }

    fn sessions_sharing_ip(
        &self,
        survey_id: &str,
        ip_address: &str,
        exclude_session: Uuid,
        now: DateTime<Utc>,
    ) -> botcheck_types::Result<Vec<Session>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::session::sessions_sharing_ip(&conn, survey_id, ip_address, exclude_session, now).map_err(Into::into)
    }

    fn sessions_sharing_fingerprint(
        &self,
        survey_id: &str,
        fingerprint: &str,
        exclude_session: Uuid,
    ) -> botcheck_types::Result<Vec<Session>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::session::sessions_sharing_fingerprint(&conn, survey_id, fingerprint, exclude_session).map_err(Into::into)
    }

    fn other_response_texts(
        &self,
        survey_id: &str,
        question_id: Uuid,
        exclude_session: Uuid,
    ) -> botcheck_types::Result<Vec<String>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::response::other_texts_for_question(&conn, survey_id, question_id, exclude_session).map_err(Into::into)
    }

    fn responses_in_last_hour(
        &self,
        survey_id: &str,
        respondent_id: &str,
        ip_address: Option<&str>,
        fingerprint: Option<&str>,
        now: DateTime<Utc>,
    ) -> botcheck_types::Result<u64> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::response::responses_in_last_hour(&conn, survey_id, respondent_id, ip_address, fingerprint, now)
            .map_err(Into::into)
    }

    fn responses_for_session(&self, session_id: Uuid) -> botcheck_types::Result<Vec<SurveyResponse>> {
        Database::list_responses(self, session_id).map_err(Into::into)
    }
}

impl botcheck_core::AggregateStore for Database {
    fn sessions_in_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
    ) -> botcheck_types::Result<Vec<Session>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::session::list_by_hierarchy(&conn, survey_id, platform_id, respondent_id).map_err(Into::into)
    }

    fn detections_in_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> botcheck_types::Result<Vec<DetectionResult>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::detection::list_by_hierarchy(&conn, survey_id, platform_id, respondent_id, since, until).map_err(Into::into)
    }

    fn fraud_indicators_in_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
    ) -> botcheck_types::Result<Vec<FraudIndicator>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::fraud::list_by_hierarchy(&conn, survey_id, platform_id, respondent_id).map_err(Into::into)
    }

    fn responses_in_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
    ) -> botcheck_types::Result<Vec<SurveyResponse>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::response::list_in_hierarchy(&conn, survey_id, platform_id, respondent_id).map_err(Into::into)
    }

    fn grid_rows_in_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
    ) -> botcheck_types::Result<Vec<GridResponseRow>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::grid::list_in_hierarchy(&conn, survey_id, platform_id, respondent_id).map_err(Into::into)
    }

    fn timing_analyses_in_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
    ) -> botcheck_types::Result<Vec<TimingAnalysis>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::timing::list_in_hierarchy(&conn, survey_id, platform_id, respondent_id).map_err(Into::into)
    }

    fn event_count_in_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
    ) -> botcheck_types::Result<usize> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        queries::event::count_in_hierarchy(&conn, survey_id, platform_id, respondent_id).map_err(Into::into)
    }
}
