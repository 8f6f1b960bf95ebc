//! Workout Timer - countdown sessions for scheduled workouts
//!
//! This library provides the workout session countdown engine, the state
//! that owns an open session and drives it from a tick source, and the
//! backend adapter that records completed workouts.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{BackendError, SyncFailure, TimerError};
pub use state::{AppState, SessionState, TimerSnapshot, WorkoutSession};
pub use utils::signals::shutdown_signal;
