//! Published timer snapshots and completion events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    progress::format_clock,
    session::{SessionState, WorkoutSession},
};
use crate::models::Workout;

/// Backend sync progress for the current run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncStatus {
    NotRequested,
    Pending,
    Synced,
    Failed { reason: String },
}

/// Signal fired once when a run reaches zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionEvent {
    /// Session the run belongs to
    pub serial: u64,
    pub run: u32,
    pub workout_id: String,
    pub completed_at: DateTime<Utc>,
}

/// Read-only view of the timer, published on every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub workout_id: Option<String>,
    pub workout_name: Option<String>,
    pub state: Option<SessionState>,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub progress_percent: u8,
    /// Remaining time as `MM:SS`
    pub display: String,
    pub run: u32,
    pub sync: SyncStatus,
}

impl TimerSnapshot {
    /// Snapshot used while no session is open
    pub fn empty() -> Self {
        Self {
            workout_id: None,
            workout_name: None,
            state: None,
            total_seconds: 0,
            remaining_seconds: 0,
            progress_percent: 0,
            display: format_clock(0),
            run: 0,
            sync: SyncStatus::NotRequested,
        }
    }

    pub fn of(workout: &Workout, session: &WorkoutSession, sync: &SyncStatus) -> Self {
        Self {
            workout_id: Some(workout.id.clone()),
            workout_name: Some(workout.name.clone()),
            state: Some(session.state()),
            total_seconds: session.total_seconds(),
            remaining_seconds: session.remaining_seconds(),
            progress_percent: session.progress_percent(),
            display: format_clock(session.remaining_seconds()),
            run: session.run(),
            sync: sync.clone(),
        }
    }

    /// Check if the countdown is currently running
    pub fn is_active(&self) -> bool {
        self.state == Some(SessionState::Running)
    }

    pub fn is_completed(&self) -> bool {
        self.state == Some(SessionState::Completed)
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
