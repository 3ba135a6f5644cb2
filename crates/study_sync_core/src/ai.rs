//! crates/study_sync_core/src/ai.rs
//!
//! Schema-validated parsing of AI service responses.
//!
//! The AI boundary returns free-form text that is *expected* to contain a
//! JSON payload, frequently wrapped in markdown code fences. Everything here
//! is pure: strip the incidental formatting, decode, and validate the shape
//! explicitly. A failure at any step yields `Err` and nothing else — callers
//! never see a partially validated payload.

use serde::Deserialize;

use crate::domain::QuizQuestion;

/// Parse failures for AI response payloads.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response shape is invalid: {0}")]
    Schema(String),
}

/// Removes markdown code-fence wrappers (```` ```json … ``` ````) the model
/// sometimes adds around its payload.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

#[derive(Deserialize)]
struct SummaryPayload {
    points: Vec<String>,
}

/// Decodes a summary response: `{"points": ["..."]}` with at least one
/// non-blank point.
pub fn parse_summary(raw: &str) -> Result<Vec<String>, ParseError> {
    let payload: SummaryPayload = serde_json::from_str(&strip_code_fences(raw))?;
    if payload.points.is_empty() {
        return Err(ParseError::Schema("summary contains no points".into()));
    }
    if payload.points.iter().any(|p| p.trim().is_empty()) {
        return Err(ParseError::Schema("summary contains a blank point".into()));
    }
    Ok(payload.points)
}

/// Decodes a quiz response: a JSON array of question objects, each with
/// exactly four options and a valid `correctIndex`.
pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>, ParseError> {
    let questions: Vec<QuizQuestion> = serde_json::from_str(&strip_code_fences(raw))?;
    if questions.is_empty() {
        return Err(ParseError::Schema("quiz contains no questions".into()));
    }
    for (i, q) in questions.iter().enumerate() {
        if q.question.trim().is_empty() {
            return Err(ParseError::Schema(format!("question {i} has no text")));
        }
        if q.options.len() != 4 {
            return Err(ParseError::Schema(format!(
                "question {i} has {} options, expected 4",
                q.options.len()
            )));
        }
        if q.correct_index >= q.options.len() {
            return Err(ParseError::Schema(format!(
                "question {i} has correctIndex {} out of range",
                q.correct_index
            )));
        }
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_code_fences() {
        let fenced = "```json\n{\"points\": [\"a\"]}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"points\": [\"a\"]}");
    }

    #[test]
    fn parses_a_plain_summary() {
        let points = parse_summary(r#"{"points": ["one", "two"]}"#).unwrap();
        assert_eq!(points, vec!["one", "two"]);
    }

    #[test]
    fn parses_a_fenced_summary() {
        let points = parse_summary("```json\n{\"points\": [\"only\"]}\n```").unwrap();
        assert_eq!(points, vec!["only"]);
    }

    #[test]
    fn rejects_summary_without_points_key() {
        assert!(matches!(
            parse_summary(r#"{"bullets": ["x"]}"#),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn rejects_empty_and_blank_summaries() {
        assert!(matches!(
            parse_summary(r#"{"points": []}"#),
            Err(ParseError::Schema(_))
        ));
        assert!(matches!(
            parse_summary(r#"{"points": ["ok", "  "]}"#),
            Err(ParseError::Schema(_))
        ));
    }

    #[test]
    fn rejects_non_json_text() {
        assert!(matches!(
            parse_summary("Sure! Here are your bullet points:"),
            Err(ParseError::Json(_))
        ));
    }

    const VALID_QUIZ: &str = r#"[
        {
            "question": "What is 2 + 2?",
            "options": ["3", "4", "5", "6"],
            "correctIndex": 1,
            "explanation": "Basic arithmetic."
        }
    ]"#;

    #[test]
    fn parses_a_valid_quiz() {
        let questions = parse_quiz(VALID_QUIZ).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_index, 1);
        assert_eq!(questions[0].options[1], "4");
    }

    #[test]
    fn parses_a_fenced_quiz() {
        let fenced = format!("```json\n{VALID_QUIZ}\n```");
        assert_eq!(parse_quiz(&fenced).unwrap().len(), 1);
    }

    #[test]
    fn rejects_wrong_option_count() {
        let raw = r#"[{"question": "q", "options": ["a", "b"], "correctIndex": 0, "explanation": "e"}]"#;
        assert!(matches!(parse_quiz(raw), Err(ParseError::Schema(_))));
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let raw = r#"[{"question": "q", "options": ["a", "b", "c", "d"], "correctIndex": 4, "explanation": "e"}]"#;
        assert!(matches!(parse_quiz(raw), Err(ParseError::Schema(_))));
    }

    #[test]
    fn rejects_an_empty_quiz() {
        assert!(matches!(parse_quiz("[]"), Err(ParseError::Schema(_))));
    }
}
