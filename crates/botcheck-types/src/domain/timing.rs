use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-response timing classification (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingAnalysis {
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub response_time_ms: u64,
    pub is_speeder: bool,
    pub is_flatliner: bool,
    /// z-score vs prior same-question responses; `None` with < 3 prior observations.
    pub anomaly_z: Option<f64>,
}

impl TimingAnalysis {
    pub fn is_anomaly(&self, threshold: f64) -> bool {
        self.anomaly_z.map(|z| z.abs() > threshold).unwrap_or(false)
    }
}
