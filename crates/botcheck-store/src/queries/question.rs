use crate::Result;
use botcheck_types::{QuestionType, SurveyQuestion};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

fn type_str(t: QuestionType) -> &'static str {
    match t {
        QuestionType::OpenEnded => "open_ended",
        QuestionType::Grid => "grid",
        QuestionType::Single => "single",
        QuestionType::Multi => "multi",
        QuestionType::Other => "other",
    }
}

fn parse_type(s: &str) -> QuestionType {
    match s {
        "open_ended" => QuestionType::OpenEnded,
        "grid" => QuestionType::Grid,
        "single" => QuestionType::Single,
        "multi" => QuestionType::Multi,
        _ => QuestionType::Other,
    }
}

fn from_row(row: &Row) -> rusqlite::Result<SurveyQuestion> {
    Ok(SurveyQuestion {
        id: row.get::<_, String>(0)?.parse().unwrap_or_else(|_| Uuid::nil()),
        session_id: row.get::<_, String>(1)?.parse().unwrap_or_else(|_| Uuid::nil()),
        question_text: row.get(2)?,
        question_type: parse_type(&row.get::<_, String>(3)?),
        element_id: row.get(4)?,
        created_at: row.get::<_, String>(5)?.parse().unwrap_or_else(|_| chrono::Utc::now()),
    })
}

pub fn insert(conn: &Connection, question: &SurveyQuestion) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO survey_questions (id, session_id, question_text, question_type, element_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(id) DO NOTHING
        "#,
        params![
            question.id.to_string(),
            question.session_id.to_string(),
            question.question_text,
            type_str(question.question_type),
            question.element_id,
            question.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn list_for_session(conn: &Connection, session_id: Uuid) -> Result<Vec<SurveyQuestion>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, session_id, question_text, question_type, element_id, created_at
        FROM survey_questions WHERE session_id = ?1
        "#,
    )?;
    let rows = stmt.query_map(params![session_id.to_string()], |row| from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
