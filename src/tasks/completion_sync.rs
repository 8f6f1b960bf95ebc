//! Completion sync background task

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use crate::{
    error::SyncFailure,
    services::CompletionSync,
    state::{AppState, CompletionEvent},
};

/// Background task that pushes each completed run to the backend exactly once.
///
/// Failures are recorded as warnings on the state and never retried; the
/// session stays `Completed` either way. `completion_rx` should come from
/// [`AppState::subscribe_completions`] before the countdown is started.
pub async fn completion_sync_task(
    state: Arc<AppState>,
    mut completion_rx: broadcast::Receiver<CompletionEvent>,
    sync: Arc<dyn CompletionSync>,
) {
    info!("Starting completion sync task");

    loop {
        match completion_rx.recv().await {
            Ok(event) => {
                if !state.claim_completion(&event) {
                    debug!(
                        "Skipping stale completion for session #{} run {}",
                        event.serial, event.run
                    );
                    continue;
                }

                info!("Syncing completion of workout {}", event.workout_id);
                let result = sync
                    .mark_complete(&event.workout_id)
                    .await
                    .map_err(|source| SyncFailure {
                        workout_id: event.workout_id.clone(),
                        source,
                    });

                if let Err(failure) = &result {
                    warn!("{}", failure);
                }
                state.record_sync(&event, result);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Completion sync lagged, {} events dropped", skipped);
            }
            Err(RecvError::Closed) => {
                error!("Completion channel closed, stopping sync task");
                break;
            }
        }
    }
}
