use std::collections::BTreeMap;

/// Identifies one scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u32);

/// Cancellable one-shot timers.
///
/// Implementations deliver a fired timer back to the owner as
/// `SheetEvent::TimerFired(handle)`; scheduling itself never runs the task.
pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Keeps at most one pending timer; each trigger supersedes the previous one.
#[derive(Debug)]
pub struct Debouncer {
    delay_ms: u32,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Debouncer {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Cancel whatever is pending and start a fresh quiet period.
    pub fn trigger<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T) -> TimerHandle {
        self.cancel(scheduler);
        let handle = scheduler.schedule(self.delay_ms);
        self.pending = Some(handle);
        handle
    }

    /// Accept a fired timer. Only the current pending handle counts; anything
    /// else is a superseded timer and returns false.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T) {
        if let Some(old) = self.pending.take() {
            scheduler.cancel(old);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Scheduler driven by a fake clock.
///
/// Time only moves through [`ManualScheduler::advance`], which hands back the
/// timers that came due so the caller can dispatch them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: u64,
    next_id: u32,
    // (deadline, id) -> handle, so due timers come out in deadline order
    pending: BTreeMap<(u64, u32), TimerHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        ManualScheduler::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward and return every timer whose deadline passed.
    pub fn advance(&mut self, ms: u64) -> Vec<TimerHandle> {
        self.now += ms;
        let still_pending = self.pending.split_off(&(self.now + 1, 0));
        let due = std::mem::replace(&mut self.pending, still_pending);
        due.into_values().collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending
            .insert((self.now + u64::from(delay_ms), self.next_id), handle);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|_, h| *h != handle);
    }
}
