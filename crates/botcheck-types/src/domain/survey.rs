use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    OpenEnded,
    Grid,
    Single,
    Multi,
    Other,
}

/// Captured question text for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    pub element_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
