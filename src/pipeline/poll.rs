// src/pipeline/poll.rs

//! The polling control loop.
//!
//! One logical thread of control: fetch the review window, advance the
//! cursor, translate the first pending homework, deliver, sleep, repeat.
//! Nothing that happens after startup is allowed to stop the loop.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::pipeline::verdict;
use crate::services::{MessageSink, ReviewApi};

/// Operator-facing text sent when an iteration fails unexpectedly.
const FAILURE_MESSAGE: &str = "Poller hit an error";

/// What a single poll iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No homework updates in the window.
    Idle,
    /// A verdict was translated and delivered.
    Delivered { message: String },
    /// A verdict was translated but the delivery was absorbed as failed.
    Lost { message: String },
}

/// Advance the cursor using the server-reported timestamp.
///
/// The cursor never rewinds, and a timestamp that does not name a valid
/// point in time is ignored rather than trusted.
pub fn advance_cursor(cursor: i64, current_date: Option<i64>) -> i64 {
    match current_date {
        Some(date) if DateTime::from_timestamp(date, 0).is_some() => cursor.max(date),
        Some(date) => {
            tracing::warn!("ignoring unrepresentable current_date {date} from server");
            cursor
        }
        None => cursor,
    }
}

/// Run one poll iteration, advancing `cursor` on a successful fetch.
///
/// Fetch and translation failures propagate to the caller's failure policy;
/// on a fetch failure the cursor is untouched, so the next cycle retries
/// the same window. Delivery failures never propagate — they come back as
/// [`PollOutcome::Lost`].
pub async fn poll_once(
    cursor: &mut i64,
    review: &dyn ReviewApi,
    sink: &dyn MessageSink,
) -> Result<PollOutcome> {
    let response = review.fetch(*cursor).await?;
    *cursor = advance_cursor(*cursor, response.current_date);
    tracing::debug!("review response {response:?}, cursor now {cursor}");

    let Some(record) = response.homeworks.first() else {
        tracing::info!("work not found");
        return Ok(PollOutcome::Idle);
    };

    let message = verdict::translate(record)?;
    match sink.send(&message).await {
        Some(sent) => {
            tracing::info!("message delivered (id {}): {message:?}", sent.message_id);
            Ok(PollOutcome::Delivered { message })
        }
        None => Ok(PollOutcome::Lost { message }),
    }
}

/// Iteration failure policy.
///
/// Messaging-layer errors are logged briefly and never echoed back into the
/// chat, so the bot cannot loop on its own delivery failures. Everything
/// else is logged with full detail and best-effort reported to the chat.
async fn report_failure(error: &AppError, sink: &dyn MessageSink) {
    if error.is_messaging() {
        tracing::error!("iteration failed in messaging layer: {error}");
    } else {
        tracing::error!("iteration failed: {error:?}");
        let _ = sink.send(&format!("{FAILURE_MESSAGE} ({error})")).await;
    }
}

/// Run the poll loop until the process is terminated.
pub async fn run_poller(config: &Config, review: &dyn ReviewApi, sink: &dyn MessageSink) {
    let mut cursor = Utc::now().timestamp();
    let pause = Duration::from_secs(config.poll.interval_secs);
    tracing::info!("poller started, cursor {cursor}");

    loop {
        match poll_once(&mut cursor, review, sink).await {
            Ok(outcome) => tracing::debug!("iteration finished: {outcome:?}"),
            Err(error) => report_failure(&error, sink).await,
        }
        tokio::time::sleep(pause).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::models::{HomeworkRecord, ReviewResponse};
    use crate::services::SentMessage;

    /// Review API fake fed with a script of per-call results.
    struct ScriptedReview {
        script: Mutex<Vec<Result<ReviewResponse>>>,
        seen_cursors: Mutex<Vec<i64>>,
    }

    impl ScriptedReview {
        fn new(script: Vec<Result<ReviewResponse>>) -> Self {
            Self {
                script: Mutex::new(script),
                seen_cursors: Mutex::new(Vec::new()),
            }
        }

        fn cursors(&self) -> Vec<i64> {
            self.seen_cursors.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReviewApi for ScriptedReview {
        async fn fetch(&self, from_date: i64) -> Result<ReviewResponse> {
            self.seen_cursors.lock().unwrap().push(from_date);
            self.script.lock().unwrap().remove(0)
        }
    }

    /// Message sink fake recording every delivery attempt.
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
        deliver: bool,
    }

    impl RecordingSink {
        fn delivering() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                deliver: true,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                deliver: false,
            }
        }

        fn messages(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send(&self, text: &str) -> Option<SentMessage> {
            self.sent.lock().unwrap().push(text.to_string());
            self.deliver.then(|| SentMessage {
                message_id: 1,
                date: None,
            })
        }
    }

    fn approved_response(current_date: Option<i64>) -> ReviewResponse {
        ReviewResponse {
            homeworks: vec![HomeworkRecord {
                homework_name: Some(json!("Task1")),
                status: Some(json!("approved")),
            }],
            current_date,
            ..ReviewResponse::default()
        }
    }

    #[test]
    fn cursor_advances_to_current_date() {
        assert_eq!(advance_cursor(1_700_000_000, Some(1_700_000_100)), 1_700_000_100);
    }

    #[test]
    fn cursor_is_unchanged_without_current_date() {
        assert_eq!(advance_cursor(1_700_000_000, None), 1_700_000_000);
    }

    #[test]
    fn cursor_never_rewinds() {
        assert_eq!(advance_cursor(1_700_000_100, Some(1_699_999_000)), 1_700_000_100);
    }

    #[test]
    fn cursor_ignores_unrepresentable_timestamp() {
        assert_eq!(advance_cursor(1_700_000_000, Some(i64::MAX)), 1_700_000_000);
    }

    #[tokio::test]
    async fn verdict_is_delivered_and_cursor_advanced() {
        let review = ScriptedReview::new(vec![Ok(approved_response(Some(1_700_000_100)))]);
        let sink = RecordingSink::delivering();
        let mut cursor = 1_700_000_000;

        let outcome = poll_once(&mut cursor, &review, &sink).await.unwrap();

        assert!(matches!(outcome, PollOutcome::Delivered { .. }));
        assert_eq!(cursor, 1_700_000_100);
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Task1"));
        assert!(messages[0].contains("accepted by reviewer"));
    }

    #[tokio::test]
    async fn empty_window_sends_nothing_and_keeps_cursor() {
        let review = ScriptedReview::new(vec![Ok(ReviewResponse::default())]);
        let sink = RecordingSink::delivering();
        let mut cursor = 1_700_000_000;

        let outcome = poll_once(&mut cursor, &review, &sink).await.unwrap();

        assert_eq!(outcome, PollOutcome::Idle);
        assert_eq!(cursor, 1_700_000_000);
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn server_logic_failure_propagates_without_delivery() {
        let review = ScriptedReview::new(vec![Err(AppError::server_logic("\"not_ready\""))]);
        let sink = RecordingSink::delivering();
        let mut cursor = 1_700_000_000;

        let result = poll_once(&mut cursor, &review, &sink).await;

        assert!(matches!(result, Err(AppError::ServerLogic { .. })));
        assert_eq!(cursor, 1_700_000_000);
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_cursor_for_the_next_cycle() {
        let review = ScriptedReview::new(vec![
            Err(AppError::server_logic("\"not_ready\"")),
            Ok(approved_response(Some(1_700_000_100))),
        ]);
        let sink = RecordingSink::delivering();
        let mut cursor = 1_700_000_000;

        assert!(poll_once(&mut cursor, &review, &sink).await.is_err());
        assert!(poll_once(&mut cursor, &review, &sink).await.is_ok());

        // The retry queried the same window as the failed attempt.
        assert_eq!(review.cursors(), vec![1_700_000_000, 1_700_000_000]);
        assert_eq!(cursor, 1_700_000_100);
    }

    #[tokio::test]
    async fn lost_delivery_is_not_an_iteration_failure() {
        let review = ScriptedReview::new(vec![Ok(approved_response(None))]);
        let sink = RecordingSink::failing();
        let mut cursor = 1_700_000_000;

        let outcome = poll_once(&mut cursor, &review, &sink).await.unwrap();

        assert!(matches!(outcome, PollOutcome::Lost { .. }));
        assert_eq!(cursor, 1_700_000_000);
    }

    #[tokio::test]
    async fn translation_failure_propagates_but_cursor_stays_advanced() {
        let response = ReviewResponse {
            homeworks: vec![HomeworkRecord {
                homework_name: Some(json!("Task1")),
                status: Some(json!("graded")),
            }],
            current_date: Some(1_700_000_100),
            ..ReviewResponse::default()
        };
        let review = ScriptedReview::new(vec![Ok(response)]);
        let sink = RecordingSink::delivering();
        let mut cursor = 1_700_000_000;

        let result = poll_once(&mut cursor, &review, &sink).await;

        assert!(matches!(result, Err(AppError::UnknownStatus { .. })));
        // The fetch itself succeeded, so the server window moves on.
        assert_eq!(cursor, 1_700_000_100);
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn generic_failure_is_reported_to_the_chat() {
        let sink = RecordingSink::delivering();
        report_failure(&AppError::server_logic("\"boom\""), &sink).await;

        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains(FAILURE_MESSAGE));
        assert!(messages[0].contains("boom"));
    }

    #[tokio::test]
    async fn messaging_failure_is_never_reported_to_the_chat() {
        let sink = RecordingSink::delivering();
        report_failure(&AppError::messaging_api("Unauthorized"), &sink).await;
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn failure_report_swallows_its_own_delivery_failure() {
        let sink = RecordingSink::failing();
        report_failure(&AppError::server_logic("\"boom\""), &sink).await;
        // One attempt recorded, nothing delivered, no panic or propagation.
        assert_eq!(sink.messages().len(), 1);
    }
}
