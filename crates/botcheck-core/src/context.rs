use crate::{Clock, IdGen};
use async_trait::async_trait;
use botcheck_config::Config;
use botcheck_types::{
    DetectionResult, Event, FraudIndicator, GridResponseRow, Result, Session, SurveyResponse, TextClassification, TimingAnalysis,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Durable-store seam (§3 Store, §4.1 indexes). `botcheck-store` provides the
/// sqlite-backed implementation; tests substitute an in-memory fake.
pub trait Store: Send + Sync {
    fn append_events(&self, session_id: Uuid, events: Vec<Event>, cap: usize) -> Result<usize>;

    fn get_session(&self, session_id: Uuid) -> Result<Session>;

    /// Other sessions in the same survey sharing `ip_address`, split by
    /// whether they were created in the last 24h relative to `now`.
    fn sessions_sharing_ip(
        &self,
        survey_id: &str,
        ip_address: &str,
        exclude_session: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>>;

    /// Other sessions across distinct respondents sharing a device fingerprint.
    fn sessions_sharing_fingerprint(
        &self,
        survey_id: &str,
        fingerprint: &str,
        exclude_session: Uuid,
    ) -> Result<Vec<Session>>;

    /// Response texts given by other sessions to the same question, used for
    /// duplicate-text similarity.
    fn other_response_texts(
        &self,
        survey_id: &str,
        question_id: Uuid,
        exclude_session: Uuid,
    ) -> Result<Vec<String>>;

    /// Count of responses submitted by this respondent/IP/device in the
    /// trailing hour ending at `now`, for §4.4 velocity scoring.
    fn responses_in_last_hour(
        &self,
        survey_id: &str,
        respondent_id: &str,
        ip_address: Option<&str>,
        fingerprint: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<u64>;

    fn responses_for_session(&self, session_id: Uuid) -> Result<Vec<SurveyResponse>>;
}

/// Index-only read seam for the `AggregationService` (§4.8): every method
/// is scoped by hierarchy columns and must not fan out to per-session reads.
pub trait AggregateStore: Send + Sync {
    fn sessions_in_hierarchy(&self, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<Vec<Session>>;

    fn detections_in_hierarchy(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<DetectionResult>>;

    fn fraud_indicators_in_hierarchy(&self, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<Vec<FraudIndicator>>;

    fn responses_in_hierarchy(&self, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<Vec<SurveyResponse>>;

    fn grid_rows_in_hierarchy(&self, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<Vec<GridResponseRow>>;

    fn timing_analyses_in_hierarchy(&self, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<Vec<TimingAnalysis>>;

    fn event_count_in_hierarchy(&self, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>) -> Result<usize>;
}

/// Abstract text-quality collaborator (§6.2). The default implementation
/// calls an external LLM; tests use a scripted stub.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, question_text: &str, response_text: &str) -> Result<TextClassification>;
}

/// Shared handle threaded through ingest and scoring entry points instead of
/// relying on global singletons (§9).
#[derive(Clone)]
pub struct Context {
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGen>,
    pub cfg: Arc<Config>,
    pub classifier: Arc<dyn TextClassifier>,
    pub store: Arc<dyn Store>,
}

impl Context {
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGen>,
        cfg: Arc<Config>,
        classifier: Arc<dyn TextClassifier>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self { clock, ids, cfg, classifier, store }
    }
}
