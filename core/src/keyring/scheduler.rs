//! Delayed task execution for key lifecycle transitions
//!
//! The keyring never sleeps itself. It hands each transition to a
//! [`Scheduler`] and keeps the returned [`TimerHandle`] so the transition
//! can be cancelled when a key is revoked.
//!
//! Two implementations are provided:
//! - [`TokioScheduler`] spawns one tokio task per timer and runs the task
//!   body on the blocking pool.
//! - [`ManualScheduler`] keeps a simulated clock that only moves when
//!   [`ManualScheduler::advance`] is called.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::error;

use crate::errors::KeyringError;

/// Work to run once a timer elapses
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;
}

/// Cancellation handle for a scheduled task.
///
/// Dropping the handle does not cancel the task; call [`TimerHandle::cancel`].
pub struct TimerHandle {
    cancel: Box<dyn FnOnce() + Send + Sync>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    /// Handle whose cancellation does nothing
    pub fn detached() -> Self {
        Self::new(|| {})
    }

    /// Prevent the task from running if it has not started yet
    pub fn cancel(self) {
        (self.cancel)()
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle").finish_non_exhaustive()
    }
}

/// Scheduler backed by tokio timers
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Bind to the runtime the caller is running on
    pub fn current() -> Result<Self, KeyringError> {
        let handle = Handle::try_current().map_err(|e| {
            KeyringError::configuration(format!("no tokio runtime for key timers: {}", e))
        })?;
        Ok(Self { handle })
    }

    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        // Task bodies take the keyring write lock and may generate keys
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = tokio::task::spawn_blocking(task).await {
                error!("Key timer task failed: {}", e);
            }
        });
        let abort = join.abort_handle();
        TimerHandle::new(move || abort.abort())
    }
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, u64), Task>,
}

/// Deterministic scheduler driven by an explicit simulated clock.
///
/// Tasks due at the same instant run in the order they were scheduled.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time elapsed since creation
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks that have neither run nor been cancelled
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Move the clock forward, running every task that falls due.
    ///
    /// Tasks run without the clock lock held, so they may schedule or
    /// cancel other tasks. Tasks scheduled while advancing run in the same
    /// call if they fall due before the target time.
    pub fn advance(&self, by: Duration) {
        let target = self.lock().now + by;

        loop {
            let next = {
                let mut clock = self.lock();
                let due = match clock.pending.keys().next() {
                    Some(&key) if key.0 <= target => key,
                    _ => break,
                };
                clock.now = due.0;
                clock.pending.remove(&due)
            };

            if let Some(task) = next {
                task();
            }
        }

        self.lock().now = target;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let key = {
            let mut clock = self.lock();
            let key = (clock.now + delay, clock.next_id);
            clock.next_id += 1;
            clock.pending.insert(key, task);
            key
        };

        let clock = Arc::clone(&self.clock);
        TimerHandle::new(move || {
            clock
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pending
                .remove(&key);
        })
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &clock.now)
            .field("pending", &clock.pending.len())
            .finish()
    }
}
