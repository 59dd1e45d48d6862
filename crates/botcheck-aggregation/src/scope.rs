use chrono::{DateTime, Utc};

/// A hierarchy slice: `survey_id` is always required; `platform_id` and
/// `respondent_id` narrow the scan further. Every `AggregateStore` method
/// takes the same three fields, so callers build one `Scope` and reuse it
/// across the bot-detection, fraud, grid, timing, and events summaries.
#[derive(Debug, Clone)]
pub struct Scope {
    pub survey_id: String,
    pub platform_id: Option<String>,
    pub respondent_id: Option<String>,
}

impl Scope {
    pub fn survey(survey_id: impl Into<String>) -> Self {
        Self { survey_id: survey_id.into(), platform_id: None, respondent_id: None }
    }

    pub fn platform(survey_id: impl Into<String>, platform_id: impl Into<String>) -> Self {
        Self { survey_id: survey_id.into(), platform_id: Some(platform_id.into()), respondent_id: None }
    }

    pub fn respondent(survey_id: impl Into<String>, platform_id: impl Into<String>, respondent_id: impl Into<String>) -> Self {
        Self {
            survey_id: survey_id.into(),
            platform_id: Some(platform_id.into()),
            respondent_id: Some(respondent_id.into()),
        }
    }

    pub fn platform_id(&self) -> Option<&str> {
        self.platform_id.as_deref()
    }

    pub fn respondent_id(&self) -> Option<&str> {
        self.respondent_id.as_deref()
    }
}

/// Inclusive ISO-8601 UTC date filter applied to detection history (§6.1).
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
