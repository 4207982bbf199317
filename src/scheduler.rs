use std::time::{Duration, Instant};

/// Identifies one armed repeating schedule. Never reused by a scheduler.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Repeating-timer source driving [`Engine::fire`](crate::game::Engine::fire).
///
/// Instead of invoking a callback, the host asks the scheduler which handle is
/// due and hands it to the engine. The engine ticks only for the handle it
/// armed last, so a cancelled or replaced schedule can never advance the game.
pub trait Scheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle;

    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    handle: TimerHandle,
    interval: Duration,
    next_due: Instant,
}

/// Single-slot repeating timer advanced by the host loop.
///
/// Arming a new schedule replaces the previous one; cancelling a handle that
/// is no longer armed does nothing.
#[derive(Debug, Clone)]
pub struct LoopScheduler {
    now: Instant,
    next_id: u64,
    armed: Option<Armed>,
}

impl LoopScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Scheduler whose clock starts at `now`.
    #[must_use]
    pub fn starting_at(now: Instant) -> Self {
        Self {
            now,
            next_id: 0,
            armed: None,
        }
    }

    /// Advances the clock to `now` and returns the armed handle if its interval elapsed.
    ///
    /// Yields at most one handle per call. After a stall longer than one
    /// interval the schedule restarts from `now` instead of firing a burst.
    pub fn poll(&mut self, now: Instant) -> Option<TimerHandle> {
        self.advance_to(now);
        let armed = self.armed.as_mut()?;
        if self.now < armed.next_due {
            return None;
        }

        armed.next_due += armed.interval;
        if armed.next_due <= self.now {
            armed.next_due = self.now + armed.interval;
        }

        Some(armed.handle)
    }

    /// Moves the clock forward to `now` without firing anything.
    ///
    /// Hosts call this before handing input to the engine, so a schedule armed
    /// by that input counts its first interval from `now`.
    pub fn advance_to(&mut self, now: Instant) {
        self.now = self.now.max(now);
    }

    /// Time left until the armed schedule fires, or `None` when idle.
    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.armed
            .map(|armed| armed.next_due.saturating_duration_since(now))
    }

    #[must_use]
    pub fn active(&self) -> Option<TimerHandle> {
        self.armed.map(|armed| armed.handle)
    }

}

impl Default for LoopScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for LoopScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle {
        let handle = TimerHandle::new(self.next_id);
        self.next_id += 1;
        self.armed = Some(Armed {
            handle,
            interval,
            next_due: self.now + interval,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.active() == Some(handle) {
            self.armed = None;
        }
    }
}
