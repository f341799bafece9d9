//! Debounced auto-save
//!
//! The controller is a two-state machine:
//!
//! ```text
//! Idle --schedule(profile with content)--> Pending(deadline)
//! Pending --schedule--> Pending(new deadline)      (cancel and restart)
//! Pending --deadline reached, take_due--> Idle     (owner saves the snapshot)
//! Pending --cancel_pending--> Idle                 (nothing is saved)
//! ```
//!
//! At most one save is pending at a time. The controller never touches
//! storage itself: the owner polls [`AutoSaver::take_due`] and commits the
//! returned snapshot. Time comes from an injected [`Clock`] so the state
//! machine can be driven in tests without waiting.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::DEFAULT_AUTOSAVE_MS;
use crate::models::Profile;

/// Source of monotonic time
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the controller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let elapsed = *self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        self.start + elapsed
    }
}

/// Observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSaveState {
    Idle,
    Pending { deadline: Instant },
}

struct PendingSave {
    deadline: Instant,
    snapshot: Profile,
}

/// Debounced save scheduler for one editing session
pub struct AutoSaver {
    debounce: Duration,
    clock: Arc<dyn Clock>,
    pending: Option<PendingSave>,
}

impl AutoSaver {
    /// Controller on the system clock
    pub fn new(debounce: Duration) -> Self {
        Self::with_clock(debounce, Arc::new(SystemClock))
    }

    /// Controller on a specific clock
    pub fn with_clock(debounce: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            debounce,
            clock,
            pending: None,
        }
    }

    /// Quiet period before a save commits
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn state(&self) -> AutoSaveState {
        match self.pending {
            Some(ref p) => AutoSaveState::Pending {
                deadline: p.deadline,
            },
            None => AutoSaveState::Idle,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a mutation of the in-memory profile
    ///
    /// Any outstanding timer is dropped. A new one starts only if the profile
    /// has a name or at least one link, so a blank new profile is never
    /// persisted. Returns whether a save is now pending.
    pub fn schedule(&mut self, profile: &Profile) -> bool {
        let restarted = self.pending.take().is_some();

        if !profile.has_content() {
            if restarted {
                debug!("Auto-save cancelled: profile {} is empty", profile.id);
            }
            return false;
        }

        let deadline = self.clock.now() + self.debounce;
        self.pending = Some(PendingSave {
            deadline,
            snapshot: profile.clone(),
        });
        debug!(
            "Auto-save {} for profile {} in {:?}",
            if restarted { "restarted" } else { "scheduled" },
            profile.id,
            self.debounce
        );
        true
    }

    /// Drop the outstanding timer without saving
    ///
    /// Returns whether a save was pending.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Fire an expired timer
    ///
    /// Returns the snapshot to persist and goes back to idle; returns `None`
    /// while idle or before the deadline.
    pub fn take_due(&mut self) -> Option<Profile> {
        let now = self.clock.now();
        let due = matches!(self.pending, Some(ref p) if now >= p.deadline);
        if due {
            self.pending.take().map(|p| p.snapshot)
        } else {
            None
        }
    }

    /// Time left before the pending save is due
    pub fn time_until_due(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.pending
            .as_ref()
            .map(|p| p.deadline.saturating_duration_since(now))
    }
}

impl Default for AutoSaver {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_AUTOSAVE_MS))
    }
}

impl std::fmt::Debug for AutoSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSaver")
            .field("debounce", &self.debounce)
            .field("state", &self.state())
            .finish()
    }
}
