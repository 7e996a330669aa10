//! Timer scheduler
//!
//! Owns every pending timer of a page and fires them as time advances.
//! Time is virtual: the host either calls [`TimerScheduler::tick`] from its
//! event loop (real elapsed time) or [`TimerScheduler::advance`] with an
//! explicit duration, which is how tests simulate time.
//!
//! Each timer is a single cancellable task with explicit state:
//! - `Pending` - waiting for its deadline (recurring timers stay pending)
//! - `Fired` - a one-shot timer that has run
//! - `Cancelled` - stopped before it could run again
//!
//! Finished timers are reclaimed at the end of the next `advance`; after that
//! their state reads as `None`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::trace;

use crate::error::{CoreError, Result};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// Callback invoked when a timer fires
///
/// Uses Rc since the page event loop is single-threaded.
pub type TimerCallback = Rc<dyn Fn()>;

/// Lifecycle state of a timer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Pending,
    Fired,
    Cancelled,
}

struct TimerEntry {
    deadline: Duration,
    /// Some for recurring timers
    period: Option<Duration>,
    /// Registration order, breaks deadline ties
    seq: u64,
    state: TimerState,
    callback: TimerCallback,
}

struct SchedulerInner {
    timers: SlotMap<TimerId, TimerEntry>,
    now: Duration,
    next_seq: u64,
    last_tick: Instant,
}

impl SchedulerInner {
    fn insert(
        &mut self,
        delay: Duration,
        period: Option<Duration>,
        callback: TimerCallback,
    ) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(TimerEntry {
            deadline: self.now + delay,
            period,
            seq,
            state: TimerState::Pending,
            callback,
        })
    }

    /// Earliest pending timer due at or before `limit`
    fn next_due(&self, limit: Duration) -> Option<TimerId> {
        self.timers
            .iter()
            .filter(|(_, t)| t.state == TimerState::Pending && t.deadline <= limit)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(id, _)| id)
    }
}

/// Single-threaded scheduler of cancellable timers
///
/// Cloning yields another handle to the same scheduler.
#[derive(Clone)]
pub struct TimerScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                timers: SlotMap::with_key(),
                now: Duration::ZERO,
                next_seq: 0,
                last_tick: Instant::now(),
            })),
        }
    }

    /// Schedule `callback` to run every `period`
    ///
    /// The first run happens one full period from now.
    pub fn set_interval<F>(&self, period: Duration, callback: F) -> Result<TimerId>
    where
        F: Fn() + 'static,
    {
        if period.is_zero() {
            return Err(CoreError::ZeroInterval);
        }
        let id = self
            .inner
            .borrow_mut()
            .insert(period, Some(period), Rc::new(callback));
        trace!(?id, ?period, "interval scheduled");
        Ok(id)
    }

    /// Schedule `callback` to run once after `delay`
    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let slot = RefCell::new(Some(callback));
        let id = self.inner.borrow_mut().insert(
            delay,
            None,
            Rc::new(move || {
                if let Some(f) = slot.borrow_mut().take() {
                    f();
                }
            }),
        );
        trace!(?id, ?delay, "timeout scheduled");
        id
    }

    /// Cancel a pending timer
    ///
    /// Returns `true` if the timer was pending. Cancelling a timer that has
    /// already fired or been cancelled is a no-op.
    pub fn cancel(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.timers.get_mut(id) {
            Some(timer) if timer.state == TimerState::Pending => {
                timer.state = TimerState::Cancelled;
                trace!(?id, "timer cancelled");
                true
            }
            _ => false,
        }
    }

    /// Current state of a timer, `None` once it has been reclaimed
    pub fn state(&self, id: TimerId) -> Option<TimerState> {
        self.inner.borrow().timers.get(id).map(|t| t.state)
    }

    /// Time remaining until a pending timer fires
    pub fn remaining(&self, id: TimerId) -> Result<Duration> {
        let inner = self.inner.borrow();
        let timer = inner.timers.get(id).ok_or(CoreError::UnknownTimer(id))?;
        Ok(timer.deadline.saturating_sub(inner.now))
    }

    /// Number of timers still waiting to fire
    pub fn pending_count(&self) -> usize {
        self.inner
            .borrow()
            .timers
            .values()
            .filter(|t| t.state == TimerState::Pending)
            .count()
    }

    /// Virtual time elapsed since the scheduler was created
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Advance the virtual clock, firing every timer that comes due
    ///
    /// Timers fire in deadline order (ties in registration order). Callbacks
    /// run with no internal borrow held, so they may schedule or cancel
    /// timers, including their own. Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let limit = self.inner.borrow().now + by;
        let mut fired = 0;

        loop {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                let Some(id) = inner.next_due(limit) else {
                    break;
                };
                let next_seq = inner.next_seq;
                let timer = &mut inner.timers[id];
                let deadline = timer.deadline;
                match timer.period {
                    Some(period) => {
                        timer.deadline += period;
                        timer.seq = next_seq;
                    }
                    None => timer.state = TimerState::Fired,
                }
                let callback = Rc::clone(&timer.callback);
                if timer.period.is_some() {
                    inner.next_seq += 1;
                }
                inner.now = deadline;
                callback
            };

            callback();
            fired += 1;
        }

        let mut inner = self.inner.borrow_mut();
        inner.now = limit;
        let finished: SmallVec<[TimerId; 8]> = inner
            .timers
            .iter()
            .filter(|(_, t)| t.state != TimerState::Pending)
            .map(|(id, _)| id)
            .collect();
        for id in finished {
            inner.timers.remove(id);
        }

        fired
    }

    /// Advance by the real time elapsed since the previous tick
    ///
    /// Call this from the host event loop.
    pub fn tick(&self) -> usize {
        let elapsed = {
            let mut inner = self.inner.borrow_mut();
            let now = Instant::now();
            let elapsed = now.duration_since(inner.last_tick);
            inner.last_tick = now;
            elapsed
        };
        self.advance(elapsed)
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TimerScheduler")
            .field("now", &inner.now)
            .field("timers", &inner.timers.len())
            .finish()
    }
}
