//! Progress logging background task

use std::sync::Arc;

use tracing::{debug, info};

use crate::state::{AppState, SyncStatus, TimerSnapshot};

/// Follow timer updates and log them; state changes at info, ticks at debug
pub async fn progress_log_task(state: Arc<AppState>) {
    let mut updates = state.subscribe_updates();
    let mut last = updates.borrow_and_update().clone();

    while updates.changed().await.is_ok() {
        let current = updates.borrow_and_update().clone();
        log_change(&last, &current);
        last = current;
    }
}

fn log_change(last: &TimerSnapshot, current: &TimerSnapshot) {
    if current.state != last.state || current.workout_id != last.workout_id {
        match current.state {
            Some(state) => info!(
                "{}: {} [{}] {}%",
                current.workout_name.as_deref().unwrap_or("workout"),
                state,
                current.display,
                current.progress_percent
            ),
            None => info!("No workout session open"),
        }
    } else if current.remaining_seconds != last.remaining_seconds {
        debug!("[{}] {}%", current.display, current.progress_percent);
    }

    if current.sync != last.sync {
        match &current.sync {
            SyncStatus::Synced => info!("Completion saved to backend"),
            SyncStatus::Failed { reason } => info!("Completion not saved: {}", reason),
            SyncStatus::Pending => debug!("Completion sync pending"),
            SyncStatus::NotRequested => {}
        }
    }
}
