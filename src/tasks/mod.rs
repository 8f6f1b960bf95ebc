//! Background tasks module
//!
//! This module contains the countdown driver, the completion sync consumer
//! and the progress logger that run alongside the control server.

pub mod completion_sync;
pub mod countdown;
pub mod progress_log;

// Re-export main functions
pub use completion_sync::completion_sync_task;
pub use countdown::{countdown_task, IntervalTicks, ManualTicks, TickSource};
pub use progress_log::progress_log_task;
