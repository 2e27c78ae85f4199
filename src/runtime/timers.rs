use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
    time::Duration,
};

use crate::runtime::{clock::TimePoint, host::InstanceId};

/// Shortest delay a timer can be armed with. A timer always fires strictly after the point
/// it was armed at, so re-arming from a handler cannot fire again at the same instant.
pub const MIN_TIMER_DELAY: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Handle to a scheduled timer. Ids grow monotonically, so they also order timers that
/// share a deadline by scheduling order.
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a timer means to the sequencer that armed it.
pub enum TimerKind {
    /// Show the next slideshow image.
    SlideAdvance,
    /// Skip past a failed playlist item.
    ErrorSkip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A timer whose deadline has passed.
pub struct FiredTimer {
    pub id: TimerId,
    pub owner: InstanceId,
    pub kind: TimerKind,
    pub due: TimePoint,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    owner: InstanceId,
    kind: TimerKind,
    due: TimePoint,
}

/// Deadline-ordered one-shot timers for the single playback timeline.
///
/// Cancelled timers stay in the heap until they reach the top and are then skipped.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<(TimePoint, TimerId)>>,
    pending: HashMap<TimerId, Pending>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer that fires `after` the given point, never sooner than [`MIN_TIMER_DELAY`].
    pub fn schedule(
        &mut self,
        owner: InstanceId,
        kind: TimerKind,
        from: TimePoint,
        after: Duration,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = from.after(after.max(MIN_TIMER_DELAY));
        self.pending.insert(id, Pending { owner, kind, due });
        self.heap.push(Reverse((due, id)));
        id
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Cancel every timer armed by `owner`; returns how many were pending.
    pub fn cancel_owner(&mut self, owner: InstanceId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, p| p.owner != owner);
        before - self.pending.len()
    }

    /// Pop the earliest live timer due at or before `now`.
    pub fn pop_due(&mut self, now: TimePoint) -> Option<FiredTimer> {
        while let Some(Reverse((due, id))) = self.heap.peek().copied() {
            if due > now {
                return None;
            }
            self.heap.pop();
            if let Some(p) = self.pending.remove(&id) {
                return Some(FiredTimer {
                    id,
                    owner: p.owner,
                    kind: p.kind,
                    due: p.due,
                });
            }
        }
        None
    }

    /// Deadline of the earliest live timer.
    pub fn next_deadline(&mut self) -> Option<TimePoint> {
        while let Some(Reverse((due, id))) = self.heap.peek().copied() {
            if self.pending.contains_key(&id) {
                return Some(due);
            }
            self.heap.pop();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_for(&self, owner: InstanceId) -> usize {
        self.pending.values().filter(|p| p.owner == owner).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/timers.rs"]
mod tests;
