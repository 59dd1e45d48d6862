use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of a grid/matrix question response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridResponseRow {
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub row_id: String,
    pub value: String,
    pub response_time_ms: Option<u64>,
}
