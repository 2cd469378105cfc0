// src/utils/http.rs

//! HTTP client construction.

use std::time::Duration;

use crate::error::Result;

/// Create an asynchronous HTTP client with an explicit per-request timeout.
pub fn create_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| crate::error::AppError::config(format!("failed to build HTTP client: {e}")))?;
    Ok(client)
}
