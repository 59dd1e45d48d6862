use crate::Result;
use rusqlite::Connection;

/// Creates every table and composite index the store needs (§3 data model,
/// §4.1 indexes). Additive only: never drops or alters existing columns.
pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            survey_id TEXT NOT NULL,
            platform_id TEXT NOT NULL,
            respondent_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            status TEXT NOT NULL,
            user_agent TEXT,
            ip_address TEXT,
            device_fingerprint TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_hierarchy
            ON sessions(survey_id, platform_id, respondent_id, id);
        CREATE INDEX IF NOT EXISTS idx_sessions_ip
            ON sessions(survey_id, ip_address);
        CREATE INDEX IF NOT EXISTS idx_sessions_fingerprint
            ON sessions(survey_id, device_fingerprint);

        CREATE TABLE IF NOT EXISTS events (
            session_id TEXT NOT NULL,
            seq INTEGER NOT NULL,
            event_type TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            payload TEXT NOT NULL,
            element_id TEXT,
            element_type TEXT,
            PRIMARY KEY (session_id, seq),
            FOREIGN KEY (session_id) REFERENCES sessions(id)
        );

        CREATE INDEX IF NOT EXISTS idx_events_session_type
            ON events(session_id, event_type);

        CREATE TABLE IF NOT EXISTS survey_questions (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            question_text TEXT NOT NULL,
            question_type TEXT NOT NULL,
            element_id TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (session_id) REFERENCES sessions(id)
        );

        CREATE INDEX IF NOT EXISTS idx_questions_session ON survey_questions(session_id);

        CREATE TABLE IF NOT EXISTS survey_responses (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            question_id TEXT NOT NULL,
            response_text TEXT NOT NULL,
            response_time_ms INTEGER NOT NULL,
            quality_score REAL,
            is_flagged INTEGER NOT NULL DEFAULT 0,
            flag_reasons TEXT NOT NULL DEFAULT '[]',
            FOREIGN KEY (session_id) REFERENCES sessions(id)
        );

        CREATE INDEX IF NOT EXISTS idx_responses_session ON survey_responses(session_id);
        CREATE INDEX IF NOT EXISTS idx_responses_question ON survey_responses(question_id);

        CREATE TABLE IF NOT EXISTS grid_response_rows (
            session_id TEXT NOT NULL,
            question_id TEXT NOT NULL,
            row_id TEXT NOT NULL,
            value TEXT NOT NULL,
            response_time_ms INTEGER,
            PRIMARY KEY (session_id, question_id, row_id),
            FOREIGN KEY (session_id) REFERENCES sessions(id)
        );

        CREATE TABLE IF NOT EXISTS timing_analyses (
            session_id TEXT NOT NULL,
            question_id TEXT NOT NULL,
            response_time_ms INTEGER NOT NULL,
            is_speeder INTEGER NOT NULL,
            is_flatliner INTEGER NOT NULL,
            anomaly_z REAL,
            PRIMARY KEY (session_id, question_id),
            FOREIGN KEY (session_id) REFERENCES sessions(id)
        );

        CREATE TABLE IF NOT EXISTS detection_results (
            session_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            is_bot INTEGER NOT NULL,
            confidence_score REAL NOT NULL,
            risk_level TEXT NOT NULL,
            method_scores TEXT NOT NULL,
            processing_time_ms INTEGER NOT NULL,
            event_count INTEGER NOT NULL,
            composite_score REAL,
            text_quality_score REAL,
            fraud_score REAL,
            summary TEXT NOT NULL,
            PRIMARY KEY (session_id, created_at),
            FOREIGN KEY (session_id) REFERENCES sessions(id)
        );

        CREATE INDEX IF NOT EXISTS idx_detections_session ON detection_results(session_id);

        CREATE TABLE IF NOT EXISTS fraud_indicators (
            session_id TEXT PRIMARY KEY,
            survey_id TEXT NOT NULL,
            platform_id TEXT NOT NULL,
            respondent_id TEXT NOT NULL,
            overall_fraud_score REAL NOT NULL,
            is_duplicate INTEGER NOT NULL,
            ip_score REAL NOT NULL,
            device_score REAL NOT NULL,
            duplicate_score REAL NOT NULL,
            geo_score REAL NOT NULL,
            velocity_score REAL NOT NULL,
            flag_reasons TEXT NOT NULL,
            FOREIGN KEY (session_id) REFERENCES sessions(id)
        );

        CREATE INDEX IF NOT EXISTS idx_fraud_hierarchy
            ON fraud_indicators(survey_id, platform_id, respondent_id);
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn).unwrap();
        init(&conn).unwrap();
    }
}
