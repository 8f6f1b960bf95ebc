//! Countdown engine for a single workout session

use std::fmt;

use serde::{Deserialize, Serialize};

use super::progress::progress_percent;
use crate::error::TimerError;

/// Lifecycle of a workout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Completed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// User-requested transitions that can be rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Start,
    Pause,
}

impl fmt::Display for TimerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerAction::Start => f.write_str("start"),
            TimerAction::Pause => f.write_str("pause"),
        }
    }
}

/// Result of feeding one tick into a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The session was not running; nothing changed.
    Ignored,
    /// One second was counted down.
    Counted { remaining: u64 },
    /// The countdown reached zero on this tick. Yielded once per run.
    Completed,
}

/// In-memory countdown for one workout attempt.
///
/// `remaining_seconds` only moves through [`tick`](Self::tick) and
/// [`reset`](Self::reset), and always stays within `0..=total_seconds`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutSession {
    total_seconds: u64,
    remaining_seconds: u64,
    state: SessionState,
    run: u32,
}

impl WorkoutSession {
    /// Create an idle session counting down from `total_seconds`
    pub fn new(total_seconds: u64) -> Result<Self, TimerError> {
        if total_seconds == 0 {
            return Err(TimerError::InvalidDuration(total_seconds));
        }

        Ok(Self {
            total_seconds,
            remaining_seconds: total_seconds,
            state: SessionState::Idle,
            run: 0,
        })
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.total_seconds - self.remaining_seconds
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of resets performed on this session
    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.total_seconds, self.remaining_seconds)
    }

    /// Begin or resume the countdown
    pub fn start(&mut self) -> Result<(), TimerError> {
        match self.state {
            SessionState::Idle | SessionState::Paused => {
                self.state = SessionState::Running;
                Ok(())
            }
            state => Err(TimerError::InvalidTransition {
                action: TimerAction::Start,
                state,
            }),
        }
    }

    /// Suspend a running countdown, keeping the remaining time
    pub fn pause(&mut self) -> Result<(), TimerError> {
        match self.state {
            SessionState::Running => {
                self.state = SessionState::Paused;
                Ok(())
            }
            state => Err(TimerError::InvalidTransition {
                action: TimerAction::Pause,
                state,
            }),
        }
    }

    /// Count down one second. Stray ticks outside `Running` are ignored.
    pub fn tick(&mut self) -> Tick {
        if self.state != SessionState::Running {
            return Tick::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.state = SessionState::Completed;
            Tick::Completed
        } else {
            Tick::Counted {
                remaining: self.remaining_seconds,
            }
        }
    }

    /// Return to `Idle` with the full duration and begin a new run
    pub fn reset(&mut self) {
        self.remaining_seconds = self.total_seconds;
        self.state = SessionState::Idle;
        self.run = self.run.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(total: u64) -> WorkoutSession {
        let mut session = WorkoutSession::new(total).unwrap();
        session.start().unwrap();
        session
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert_eq!(WorkoutSession::new(0), Err(TimerError::InvalidDuration(0)));
    }

    #[test]
    fn new_session_is_idle_and_full() {
        let session = WorkoutSession::new(90).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.remaining_seconds(), 90);
        assert_eq!(session.progress_percent(), 0);
    }

    #[test]
    fn full_countdown_completes_exactly_once() {
        for total in [1, 2, 5, 60, 1800] {
            let mut session = running(total);
            let mut completions = 0;
            for _ in 0..total {
                if session.tick() == Tick::Completed {
                    completions += 1;
                }
            }
            assert_eq!(session.state(), SessionState::Completed);
            assert_eq!(session.remaining_seconds(), 0);
            assert_eq!(completions, 1);

            // Extra ticks after completion change nothing.
            assert_eq!(session.tick(), Tick::Ignored);
            assert_eq!(session.remaining_seconds(), 0);
        }
    }

    #[test]
    fn five_second_session_reaches_full_progress() {
        let mut session = running(5);
        let outcomes: Vec<Tick> = (0..5).map(|_| session.tick()).collect();
        assert_eq!(outcomes[0], Tick::Counted { remaining: 4 });
        assert_eq!(outcomes[4], Tick::Completed);
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.progress_percent(), 100);
    }

    #[test]
    fn ticks_outside_running_are_ignored() {
        let mut idle = WorkoutSession::new(10).unwrap();
        assert_eq!(idle.tick(), Tick::Ignored);
        assert_eq!(idle.remaining_seconds(), 10);
        assert_eq!(idle.state(), SessionState::Idle);

        let mut paused = running(10);
        paused.tick();
        paused.pause().unwrap();
        let before = paused.clone();
        assert_eq!(paused.tick(), Tick::Ignored);
        assert_eq!(paused, before);
    }

    #[test]
    fn pause_and_resume_keeps_remaining_time() {
        let mut session = running(10);
        for _ in 0..3 {
            session.tick();
        }
        session.pause().unwrap();
        assert_eq!(session.tick(), Tick::Ignored);
        assert_eq!(session.remaining_seconds(), 7);

        session.start().unwrap();
        assert_eq!(session.remaining_seconds(), 7);
        let completions = (0..7).filter(|_| session.tick() == Tick::Completed).count();
        assert_eq!(completions, 1);
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn pause_while_idle_is_invalid() {
        let mut session = WorkoutSession::new(10).unwrap();
        assert_eq!(
            session.pause(),
            Err(TimerError::InvalidTransition {
                action: TimerAction::Pause,
                state: SessionState::Idle,
            })
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn start_is_rejected_when_running_or_completed() {
        let mut session = running(1);
        assert!(matches!(
            session.start(),
            Err(TimerError::InvalidTransition { state: SessionState::Running, .. })
        ));

        session.tick();
        assert!(matches!(
            session.start(),
            Err(TimerError::InvalidTransition { state: SessionState::Completed, .. })
        ));
        assert!(session.pause().is_err());
    }

    #[test]
    fn reset_restores_every_state() {
        let mut idle = WorkoutSession::new(4).unwrap();
        let mut running_session = running(4);
        running_session.tick();
        let mut paused = running(4);
        paused.tick();
        paused.pause().unwrap();
        let mut completed = running(1);
        completed.tick();

        for session in [&mut idle, &mut running_session, &mut paused, &mut completed] {
            let run = session.run();
            session.reset();
            assert_eq!(session.state(), SessionState::Idle);
            assert_eq!(session.remaining_seconds(), session.total_seconds());
            assert_eq!(session.run(), run + 1);
        }
    }

    #[test]
    fn completed_session_can_run_again_after_reset() {
        let mut session = running(2);
        session.tick();
        session.tick();
        session.reset();
        session.start().unwrap();
        assert_eq!(session.tick(), Tick::Counted { remaining: 1 });
        assert_eq!(session.tick(), Tick::Completed);
    }

    #[test]
    fn progress_never_decreases_while_running() {
        let mut session = running(7);
        let mut last = session.progress_percent();
        while session.is_running() {
            session.tick();
            let now = session.progress_percent();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 100);
    }
}
