// src/services/mod.rs

//! External service clients.
//!
//! The poll loop only sees the two seam traits here, so iteration behavior
//! can be exercised against in-memory fakes.

pub mod review;
pub mod telegram;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ReviewResponse;

pub use review::ReviewClient;
pub use telegram::{Notifier, SentMessage};

/// Review API seam used by the poll loop.
#[async_trait]
pub trait ReviewApi {
    /// Fetch homework updates for the window starting at `from_date`.
    async fn fetch(&self, from_date: i64) -> Result<ReviewResponse>;
}

/// Message delivery seam used by the poll loop.
///
/// Implementations absorb their own failures: `None` means the message was
/// lost and the loop carries on.
#[async_trait]
pub trait MessageSink {
    /// Deliver `text` to the configured chat, best-effort.
    async fn send(&self, text: &str) -> Option<SentMessage>;
}
