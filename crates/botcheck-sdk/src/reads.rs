use crate::Result;
use botcheck_aggregation::{summarize, DateRange, HierarchySummary, Scope};
use botcheck_config::GridConfig;
use botcheck_store::Database;
use botcheck_types::{DetectionResult, FraudIndicator, Session};
use chrono::{DateTime, Utc};

/// `limit`/`offset` for list endpoints (§6.1); `limit` is clamped to
/// `[1, 1000]`, defaulting to 100.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self { limit: 100, offset: 0 }
    }
}

impl Page {
    fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let limit = self.limit.clamp(1, 1000);
        items.into_iter().skip(self.offset).take(limit).collect()
    }
}

/// `/surveys/{survey_id}/platforms/{platform_id}/respondents/.../sessions`
/// and the parallel fraud/grid/timing/text-analysis trees (§6.1). All reads
/// go through `AggregateStore`'s hierarchy-scoped scans.
pub struct HierarchicalReader<'a> {
    db: &'a Database,
}

impl<'a> HierarchicalReader<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn sessions(&self, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>, page: Page) -> Result<Vec<Session>> {
        let sessions = self.db.list_sessions_by_hierarchy(survey_id, platform_id, respondent_id)?;
        Ok(page.apply(sessions))
    }

    pub fn detections(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
        page: Page,
    ) -> Result<Vec<DetectionResult>> {
        let detections = self.db.list_detection_results_by_hierarchy(survey_id, platform_id, respondent_id, date_from, date_to)?;
        Ok(page.apply(detections))
    }

    pub fn fraud_indicators(&self, survey_id: &str, platform_id: Option<&str>, respondent_id: Option<&str>, page: Page) -> Result<Vec<FraudIndicator>> {
        let indicators = self.db.list_fraud_indicators_by_hierarchy(survey_id, platform_id, respondent_id)?;
        Ok(page.apply(indicators))
    }

    pub fn detail(&self, session_id: uuid::Uuid) -> Result<(Session, Option<DetectionResult>, Option<FraudIndicator>)> {
        let session = self.db.get_session(session_id)?;
        let detection = self.db.latest_detection_result(session_id)?;
        let fraud = self.db.get_fraud_indicator(session_id)?;
        Ok((session, detection, fraud))
    }

    /// `/surveys/{survey_id}[/platforms/{platform_id}[/respondents/{respondent_id}]]/summary`
    /// and the parallel fraud/grid-analysis/timing-analysis/text-analysis
    /// summary trees, all served by the same rollup (§4.8, §6.1).
    pub fn summary(
        &self,
        survey_id: &str,
        platform_id: Option<&str>,
        respondent_id: Option<&str>,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
        grid_cfg: &GridConfig,
    ) -> Result<HierarchySummary> {
        let scope = Scope {
            survey_id: survey_id.to_string(),
            platform_id: platform_id.map(str::to_string),
            respondent_id: respondent_id.map(str::to_string),
        };
        let range = DateRange { from: date_from, to: date_to };
        Ok(summarize(self.db, &scope, range, grid_cfg)?)
    }
}
