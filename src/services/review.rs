// src/services/review.rs

//! Review API client.
//!
//! Issues the windowed status request and classifies every failure mode
//! before the payload reaches the poll loop.

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode, header};

use crate::error::{AppError, Result};
use crate::models::{ReviewConfig, ReviewResponse};
use crate::services::ReviewApi;
use crate::utils::http;

/// Client for the homework review API.
pub struct ReviewClient {
    config: ReviewConfig,
    token: String,
    client: Client,
}

impl ReviewClient {
    /// Create a client with the configured timeout and user agent.
    pub fn new(config: ReviewConfig, token: String) -> Result<Self> {
        let client = http::create_client(&config.user_agent, config.timeout_secs)?;
        Ok(Self {
            config,
            token,
            client,
        })
    }
}

#[async_trait]
impl ReviewApi for ReviewClient {
    async fn fetch(&self, from_date: i64) -> Result<ReviewResponse> {
        // A cursor that does not name a valid point in time would poison the
        // query window; the iteration is skipped instead of sent.
        if DateTime::from_timestamp(from_date, 0).is_none() {
            return Err(AppError::InvalidCursor { value: from_date });
        }

        let response = self
            .client
            .get(&self.config.url)
            .header(header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(AppError::Transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(&self.config.url));
        }

        let body = response.text().await.map_err(AppError::Transport)?;
        tracing::debug!("review API response: {body}");

        let payload: ReviewResponse = serde_json::from_str(&body)?;
        if let Some(detail) = payload.failure_detail() {
            return Err(AppError::server_logic(detail));
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> ReviewClient {
        let config = ReviewConfig {
            url: "http://127.0.0.1:9/homework_statuses/".into(),
            timeout_secs: 1,
            ..Default::default()
        };
        ReviewClient::new(config, "token".into()).unwrap()
    }

    #[tokio::test]
    async fn rejects_unrepresentable_cursor_before_any_request() {
        let result = unreachable_client().fetch(i64::MAX).await;
        assert!(matches!(
            result,
            Err(AppError::InvalidCursor { value }) if value == i64::MAX
        ));
    }

    #[tokio::test]
    async fn connection_failure_is_classified_as_transport() {
        // from_date=0 is the epoch, a valid window start, so validation
        // passes and the refused connection surfaces as a transport error.
        let result = unreachable_client().fetch(0).await;
        assert!(matches!(result, Err(AppError::Transport(_))));
    }
}
