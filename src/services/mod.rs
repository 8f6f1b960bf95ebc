//! External service integration module
//!
//! This module contains the workout backend client, the completion sync
//! seam the timer depends on, and dashboard statistics over fetched workouts.

pub mod backend;
pub mod stats;

// Re-export main types
pub use backend::{BackendClient, CompletionSync};
pub use stats::{daily_breakdown, DailyTotals, WorkoutStats};
