// src/pipeline/mod.rs

//! Poll orchestration and verdict translation.

pub mod poll;
pub mod verdict;

pub use poll::{PollOutcome, advance_cursor, poll_once, run_poller};
pub use verdict::translate;
