use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a session. Status only moves forward:
/// Active -> Completed | Expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Expired,
}

impl SessionStatus {
    /// Whether `self -> next` is a legal forward transition.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        match (self, next) {
            (Active, Completed) | (Active, Expired) => true,
            (a, b) => a == b,
        }
    }
}

/// One respondent's attempt on one survey via one platform.
///
/// `(survey_id, platform_id, respondent_id)` may repeat across sessions
/// (same respondent retrying); `id` is globally unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub survey_id: String,
    pub platform_id: String,
    pub respondent_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    /// Derived by `botcheck_core::device_fingerprint` once a `device_info`
    /// event arrives; stored so cross-session fraud comparisons are
    /// index-local instead of re-deriving it per query (§4.4).
    pub device_fingerprint: Option<String>,
}

impl Session {
    pub fn new(
        id: Uuid,
        survey_id: impl Into<String>,
        platform_id: impl Into<String>,
        respondent_id: impl Into<String>,
        user_agent: Option<String>,
        ip_address: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            survey_id: survey_id.into(),
            platform_id: platform_id.into(),
            respondent_id: respondent_id.into(),
            created_at: now,
            updated_at: now,
            status: SessionStatus::Active,
            user_agent,
            ip_address,
            device_fingerprint: None,
        }
    }

    pub fn hierarchy_key(&self) -> (&str, &str, &str) {
        (&self.survey_id, &self.platform_id, &self.respondent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_moves_forward_only() {
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Expired));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Active));
        assert!(!SessionStatus::Expired.can_transition_to(SessionStatus::Completed));
    }

    #[test]
    fn same_status_is_a_legal_noop_transition() {
        assert!(SessionStatus::Completed.can_transition_to(SessionStatus::Completed));
    }
}
