//! Review API wire models.
//!
//! The review API is loose about its payloads, so record fields are kept as
//! raw JSON values and validated by the verdict translation step instead of
//! being rejected at decode time.

use serde::Deserialize;
use serde_json::Value;

/// A single homework entry from the review API.
///
/// `homework_name` and `status` are the only fields the bot reads; anything
/// else the server includes is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomeworkRecord {
    /// Homework title, expected to be a non-empty string
    #[serde(default)]
    pub homework_name: Option<Value>,

    /// Review status, expected to be one of the known verdict keys
    #[serde(default)]
    pub status: Option<Value>,
}

/// Decoded review API response for one poll window.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewResponse {
    /// Homeworks updated since the cursor, newest first
    #[serde(default)]
    pub homeworks: Vec<HomeworkRecord>,

    /// Server-reported timestamp to advance the cursor to
    #[serde(default)]
    pub current_date: Option<i64>,

    /// Logical failure indicator
    #[serde(default)]
    pub error: Option<Value>,

    /// Alternative logical failure indicator
    #[serde(default)]
    pub code: Option<Value>,
}

impl ReviewResponse {
    /// Failure payload carried by a response that parsed as JSON but signals
    /// a server-side logical error.
    pub fn failure_detail(&self) -> Option<String> {
        match (&self.error, &self.code) {
            (Some(error), _) => Some(error.to_string()),
            (None, Some(code)) => Some(code.to_string()),
            (None, None) => None,
        }
    }
}

/// The fixed set of review statuses the bot knows how to announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Reviewing,
    Rejected,
    Approved,
}

impl HomeworkStatus {
    /// Parse a wire status string. Returns `None` for anything outside the
    /// known set.
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Human-readable verdict text for this status.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Reviewing => "work under review",
            Self::Rejected => "errors found, not accepted",
            Self::Approved => "accepted by reviewer",
        }
    }
}
