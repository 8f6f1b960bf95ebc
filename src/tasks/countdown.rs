//! Countdown driver background task and its time sources

use std::{sync::Arc, time::Duration};

use futures::stream::{self, BoxStream, StreamExt};
use tokio::{
    sync::broadcast,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::state::{AppState, Tick};

/// Periodic source of timer ticks.
///
/// Each call to [`ticks`](TickSource::ticks) yields an independent stream;
/// dropping the stream stops it.
pub trait TickSource: Send + Sync {
    fn ticks(&self) -> BoxStream<'static, ()>;
}

/// Wall-clock ticks from a tokio interval
#[derive(Debug, Clone)]
pub struct IntervalTicks {
    period: Duration,
}

impl IntervalTicks {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl TickSource for IntervalTicks {
    fn ticks(&self) -> BoxStream<'static, ()> {
        // First tick lands one full period after start, like a browser interval.
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        stream::unfold(interval, |mut interval| async move {
            interval.tick().await;
            Some(((), interval))
        })
        .boxed()
    }
}

/// Hand-driven ticks, for tests and scripted runs.
///
/// Every stream handed out receives each [`fire`](ManualTicks::fire).
#[derive(Debug, Clone)]
pub struct ManualTicks {
    tx: broadcast::Sender<()>,
}

impl ManualTicks {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1024);
        Self { tx }
    }

    /// Emit one tick. Returns how many live streams received it.
    pub fn fire(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    /// Number of streams currently listening
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ManualTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for ManualTicks {
    fn ticks(&self) -> BoxStream<'static, ()> {
        stream::unfold(self.tx.subscribe(), |mut rx| async move {
            match rx.recv().await {
                Ok(()) => Some(((), rx)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Manual tick stream lagged by {} ticks", skipped);
                    Some(((), rx))
                }
                Err(broadcast::error::RecvError::Closed) => None,
            }
        })
        .boxed()
    }
}

/// Feed ticks from one driver into the open session until it stops running.
///
/// Spawned by [`AppState::start`]; aborted on pause, reset or when another
/// session is opened.
pub async fn countdown_task(
    state: Arc<AppState>,
    driver_id: u64,
    mut ticks: BoxStream<'static, ()>,
) {
    debug!("Countdown driver {} started", driver_id);

    while ticks.next().await.is_some() {
        match state.tick(driver_id) {
            Tick::Counted { remaining } => {
                debug!("Driver {}: {}s remaining", driver_id, remaining);
            }
            Tick::Completed => {
                info!("Driver {}: countdown finished", driver_id);
                break;
            }
            Tick::Ignored => {
                debug!("Driver {} is no longer current, stopping", driver_id);
                break;
            }
        }
    }

    debug!("Countdown driver {} exited", driver_id);
}
