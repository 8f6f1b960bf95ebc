//! Main application state: owner of the active workout session

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{
    session::{SessionState, Tick, WorkoutSession},
    timer_state::{CompletionEvent, SyncStatus, TimerSnapshot},
};
use crate::{
    error::{SyncFailure, TimerError},
    models::Workout,
    tasks::countdown::{countdown_task, TickSource},
};

/// Running countdown driver bound to one session
#[derive(Debug)]
struct Driver {
    id: u64,
    task: JoinHandle<()>,
}

#[derive(Debug)]
struct ActiveSession {
    serial: u64,
    workout: Workout,
    session: WorkoutSession,
    driver: Option<Driver>,
    sync: SyncStatus,
    /// Run whose completion has already been handed to the sync adapter
    claimed_run: Option<u32>,
}

impl ActiveSession {
    fn stop_driver(&mut self) {
        if let Some(driver) = self.driver.take() {
            debug!("Stopping countdown driver {} for session #{}", driver.id, self.serial);
            driver.task.abort();
        }
    }

    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::of(&self.workout, &self.session, &self.sync)
    }
}

/// Shared state that owns the single open workout session.
///
/// All session mutation goes through this type. At most one countdown driver
/// exists per session; starting a new one aborts the previous one first.
pub struct AppState {
    session: Mutex<Option<ActiveSession>>,
    ticks: Arc<dyn TickSource>,
    next_serial: AtomicU64,
    next_driver: AtomicU64,
    /// Non-fatal problems surfaced to the user (e.g. failed syncs)
    warnings: Mutex<Vec<String>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Completion events for the sync task
    completion_tx: broadcast::Sender<CompletionEvent>,
    /// Channel for timer updates
    timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AppState {
    /// Create a new AppState with no open session
    pub fn new(port: u16, host: String, ticks: Arc<dyn TickSource>) -> Self {
        let (completion_tx, _) = broadcast::channel(16);
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerSnapshot::empty());

        Self {
            session: Mutex::new(None),
            ticks,
            next_serial: AtomicU64::new(1),
            next_driver: AtomicU64::new(1),
            warnings: Mutex::new(Vec::new()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            completion_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Open a timer for `workout`, discarding any previous session
    pub fn open_session(&self, workout: Workout) -> Result<TimerSnapshot, TimerError> {
        let session = WorkoutSession::new(workout.total_seconds()?)?;
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);

        info!(
            "Opening session #{} for workout '{}' ({}s)",
            serial,
            workout.name,
            session.total_seconds()
        );

        let snapshot = {
            let mut slot = lock(&self.session);
            if let Some(mut previous) = slot.take() {
                info!("Discarding session #{}", previous.serial);
                previous.stop_driver();
            }
            let active = ActiveSession {
                serial,
                workout,
                session,
                driver: None,
                sync: SyncStatus::NotRequested,
                claimed_run: None,
            };
            let snapshot = active.snapshot();
            *slot = Some(active);
            self.publish(snapshot.clone());
            snapshot
        };

        self.record_action("open");
        Ok(snapshot)
    }

    /// Start or resume the countdown and spawn its driver
    pub fn start(self: &Arc<Self>) -> Result<TimerSnapshot, TimerError> {
        let snapshot = {
            let mut slot = lock(&self.session);
            let active = slot.as_mut().ok_or(TimerError::NoSession)?;
            active.session.start()?;

            active.stop_driver();
            let id = self.next_driver.fetch_add(1, Ordering::Relaxed);
            let task = tokio::spawn(countdown_task(Arc::clone(self), id, self.ticks.ticks()));
            active.driver = Some(Driver { id, task });

            info!(
                "Timer started for session #{} with {}s remaining",
                active.serial,
                active.session.remaining_seconds()
            );
            let snapshot = active.snapshot();
            self.publish(snapshot.clone());
            snapshot
        };

        self.record_action("start");
        Ok(snapshot)
    }

    /// Pause the countdown and stop its driver
    pub fn pause(&self) -> Result<TimerSnapshot, TimerError> {
        let snapshot = {
            let mut slot = lock(&self.session);
            let active = slot.as_mut().ok_or(TimerError::NoSession)?;
            active.session.pause()?;
            active.stop_driver();

            info!(
                "Timer paused for session #{} at {}s remaining",
                active.serial,
                active.session.remaining_seconds()
            );
            let snapshot = active.snapshot();
            self.publish(snapshot.clone());
            snapshot
        };

        self.record_action("pause");
        Ok(snapshot)
    }

    /// Return to the full duration. Any unclaimed completion of the previous run is dropped.
    pub fn reset(&self) -> Result<TimerSnapshot, TimerError> {
        let snapshot = {
            let mut slot = lock(&self.session);
            let active = slot.as_mut().ok_or(TimerError::NoSession)?;
            active.stop_driver();
            active.session.reset();
            active.sync = SyncStatus::NotRequested;

            info!("Timer reset for session #{} (run {})", active.serial, active.session.run());
            let snapshot = active.snapshot();
            self.publish(snapshot.clone());
            snapshot
        };

        self.record_action("reset");
        Ok(snapshot)
    }

    /// Apply one tick from driver `driver_id`.
    ///
    /// Ticks from a driver that is no longer current, or for a session that is
    /// not running, are ignored.
    pub fn tick(&self, driver_id: u64) -> Tick {
        let (outcome, event) = {
            let mut slot = lock(&self.session);
            let Some(active) = slot
                .as_mut()
                .filter(|a| a.driver.as_ref().map(|d| d.id) == Some(driver_id))
            else {
                return Tick::Ignored;
            };

            let outcome = active.session.tick();
            let event = match outcome {
                Tick::Ignored => return Tick::Ignored,
                Tick::Counted { .. } => None,
                Tick::Completed => {
                    // The driver exits on its own after this tick.
                    active.driver = None;
                    active.sync = SyncStatus::Pending;
                    Some(CompletionEvent {
                        serial: active.serial,
                        run: active.session.run(),
                        workout_id: active.workout.id.clone(),
                        completed_at: Utc::now(),
                    })
                }
            };
            self.publish(active.snapshot());
            (outcome, event)
        };

        if let Some(event) = event {
            info!("Workout {} completed (session #{})", event.workout_id, event.serial);
            self.record_action("complete");
            if let Err(e) = self.completion_tx.send(event) {
                warn!("No listener for completion event: {}", e);
            }
        }

        outcome
    }

    /// Claim a completion event for syncing.
    ///
    /// Returns `true` at most once per run, and only while that run is still
    /// the current, completed one.
    pub fn claim_completion(&self, event: &CompletionEvent) -> bool {
        let mut slot = lock(&self.session);
        match slot.as_mut() {
            Some(active)
                if active.serial == event.serial
                    && active.session.run() == event.run
                    && active.session.state() == SessionState::Completed
                    && active.claimed_run != Some(event.run) =>
            {
                active.claimed_run = Some(event.run);
                true
            }
            _ => false,
        }
    }

    /// Record the outcome of syncing `event`. Never changes the session state.
    ///
    /// Results for a run that has since been reset or replaced are dropped.
    pub fn record_sync(&self, event: &CompletionEvent, result: Result<(), SyncFailure>) {
        let mut slot = lock(&self.session);
        match slot.as_mut() {
            Some(active)
                if active.serial == event.serial && active.session.run() == event.run =>
            {
                active.sync = match &result {
                    Ok(()) => SyncStatus::Synced,
                    Err(failure) => SyncStatus::Failed {
                        reason: failure.source.to_string(),
                    },
                };
                self.publish(active.snapshot());

                if let Err(failure) = result {
                    self.add_warning(failure.to_string());
                }
            }
            _ => debug!(
                "Sync result for session #{} run {} arrived after it was replaced",
                event.serial, event.run
            ),
        }
    }

    /// Drop the open session and stop its driver
    pub fn close_session(&self) {
        let mut slot = lock(&self.session);
        if let Some(mut active) = slot.take() {
            active.stop_driver();
            self.publish(TimerSnapshot::empty());
            drop(slot);

            info!("Closed session #{}", active.serial);
            self.record_action("close");
        }
    }

    /// Get current timer snapshot
    pub fn snapshot(&self) -> TimerSnapshot {
        lock(&self.session)
            .as_ref()
            .map(ActiveSession::snapshot)
            .unwrap_or_else(TimerSnapshot::empty)
    }

    /// Workout behind the open session
    pub fn workout(&self) -> Option<Workout> {
        lock(&self.session).as_ref().map(|a| a.workout.clone())
    }

    pub fn subscribe_updates(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    pub fn subscribe_completions(&self) -> broadcast::Receiver<CompletionEvent> {
        self.completion_tx.subscribe()
    }

    /// Add a user-visible warning
    pub fn add_warning(&self, warning: String) {
        warn!("Adding warning: {}", warning);
        lock(&self.warnings).push(warning);
    }

    pub fn warnings(&self) -> Vec<String> {
        lock(&self.warnings).clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        (lock(&self.last_action).clone(), *lock(&self.last_action_time))
    }

    fn record_action(&self, action: &str) {
        *lock(&self.last_action) = Some(action.to_string());
        *lock(&self.last_action_time) = Some(Utc::now());
    }

    /// Callers hold the session lock so publishes follow mutation order.
    fn publish(&self, snapshot: TimerSnapshot) {
        // send_replace never fails; the state keeps its own receiver alive.
        self.timer_update_tx.send_replace(snapshot);
    }
}
