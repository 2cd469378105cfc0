// src/models/mod.rs

//! Data models for configuration and review API payloads.

pub mod config;
pub mod homework;

pub use config::{Config, LoggingConfig, PollConfig, ReviewConfig, Secrets, TelegramConfig};
pub use homework::{HomeworkRecord, HomeworkStatus, ReviewResponse};
