//! State management module
//!
//! This module contains the countdown engine, the progress helpers built on
//! it, and the shared state that owns the open session.

pub mod app_state;
pub mod progress;
pub mod session;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use progress::{format_clock, progress_percent};
pub use session::{SessionState, Tick, TimerAction, WorkoutSession};
pub use timer_state::{CompletionEvent, SyncStatus, TimerSnapshot};
