use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Reason a response was flagged by the text quality analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    Gibberish,
    CopyPaste,
    Irrelevant,
    Generic,
    LowQuality,
}

/// One answer to one question, with text-quality fields populated by the
/// text quality analyzer after classification (or left `None` if the
/// response was never analyzed, e.g. below `min_response_length_chars`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub response_text: String,
    pub response_time_ms: u64,
    pub quality_score: Option<f64>,
    pub is_flagged: bool,
    pub flag_reasons: BTreeSet<FlagReason>,
}

impl SurveyResponse {
    pub fn new(id: Uuid, session_id: Uuid, question_id: Uuid, response_text: String, response_time_ms: u64) -> Self {
        Self {
            id,
            session_id,
            question_id,
            response_text,
            response_time_ms,
            quality_score: None,
            is_flagged: false,
            flag_reasons: BTreeSet::new(),
        }
    }

    pub fn qualifies_for_analysis(&self, min_length_chars: usize) -> bool {
        self.response_text.trim().chars().count() >= min_length_chars
    }
}
