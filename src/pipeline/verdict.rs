// src/pipeline/verdict.rs

//! Homework verdict translation.
//!
//! Pure mapping from a raw homework record to the delivered message text.
//! Validation failures come back as structured errors; logging is the
//! caller's job.

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{HomeworkRecord, HomeworkStatus};

/// Translate a homework record into a ready-to-send verdict message.
///
/// The message is a header line naming the homework plus the verdict body:
///
/// ```text
/// Your homework "Task1" has been reviewed!
///
/// accepted by reviewer
/// ```
pub fn translate(record: &HomeworkRecord) -> Result<String> {
    let name = match &record.homework_name {
        Some(Value::String(name)) if !name.is_empty() => name,
        Some(Value::String(_)) | None => {
            return Err(AppError::missing_field("homework_name", record));
        }
        Some(other) => return Err(AppError::field_type("homework_name", other)),
    };

    let status = match &record.status {
        Some(Value::String(status)) => status,
        Some(other) => return Err(AppError::field_type("status", other)),
        None => return Err(AppError::unknown_status("<missing>")),
    };

    let verdict = HomeworkStatus::parse(status)
        .ok_or_else(|| AppError::unknown_status(status.clone()))?
        .verdict();

    Ok(format!(
        "Your homework \"{name}\" has been reviewed!\n\n{verdict}"
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(name: Value, status: Value) -> HomeworkRecord {
        HomeworkRecord {
            homework_name: Some(name),
            status: Some(status),
        }
    }

    #[test]
    fn translates_every_known_status() {
        let cases = [
            ("reviewing", "work under review"),
            ("rejected", "errors found, not accepted"),
            ("approved", "accepted by reviewer"),
        ];

        for (status, verdict) in cases {
            let message = translate(&record(json!("Task1"), json!(status))).unwrap();
            assert!(message.contains("Task1"));
            assert!(message.contains(verdict));
        }
    }

    #[test]
    fn message_has_header_and_body() {
        let message = translate(&record(json!("Task1"), json!("approved"))).unwrap();
        let (header, body) = message.split_once("\n\n").unwrap();
        assert_eq!(header, "Your homework \"Task1\" has been reviewed!");
        assert_eq!(body, "accepted by reviewer");
    }

    #[test]
    fn missing_name_is_rejected() {
        let result = translate(&HomeworkRecord {
            homework_name: None,
            status: Some(json!("approved")),
        });
        assert!(matches!(result, Err(AppError::MissingField { .. })));
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = translate(&record(json!(""), json!("approved")));
        assert!(matches!(result, Err(AppError::MissingField { .. })));
    }

    #[test]
    fn non_string_name_is_rejected() {
        let result = translate(&record(json!(42), json!("approved")));
        assert!(matches!(result, Err(AppError::FieldType { .. })));
    }

    #[test]
    fn missing_status_is_rejected() {
        let result = translate(&HomeworkRecord {
            homework_name: Some(json!("Task1")),
            status: None,
        });
        assert!(matches!(result, Err(AppError::UnknownStatus { .. })));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = translate(&record(json!("Task1"), json!("graded")));
        assert!(matches!(
            result,
            Err(AppError::UnknownStatus { status }) if status == "graded"
        ));
    }

    #[test]
    fn non_string_status_is_rejected() {
        let result = translate(&record(json!("Task1"), json!({"state": "done"})));
        assert!(matches!(result, Err(AppError::FieldType { .. })));
    }
}
