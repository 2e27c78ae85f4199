use super::*;

const A: InstanceId = InstanceId(1);
const B: InstanceId = InstanceId(2);

#[test]
fn timers_fire_in_deadline_order() {
    let mut q = TimerQueue::new();
    let late = q.schedule(A, TimerKind::SlideAdvance, TimePoint::ZERO, Duration::from_secs(3));
    let early = q.schedule(B, TimerKind::ErrorSkip, TimePoint::ZERO, Duration::from_secs(1));

    assert_eq!(q.next_deadline(), Some(TimePoint(1000)));
    assert!(q.pop_due(TimePoint(999)).is_none());

    let fired = q.pop_due(TimePoint(5000)).unwrap();
    assert_eq!(fired.id, early);
    assert_eq!(fired.owner, B);
    assert_eq!(fired.kind, TimerKind::ErrorSkip);
    assert_eq!(fired.due, TimePoint(1000));

    assert_eq!(q.pop_due(TimePoint(5000)).unwrap().id, late);
    assert!(q.pop_due(TimePoint(5000)).is_none());
    assert!(q.is_empty());
}

#[test]
fn equal_deadlines_keep_scheduling_order() {
    let mut q = TimerQueue::new();
    let first = q.schedule(B, TimerKind::SlideAdvance, TimePoint(0), Duration::from_secs(1));
    let second = q.schedule(A, TimerKind::SlideAdvance, TimePoint(0), Duration::from_secs(1));
    assert_eq!(q.pop_due(TimePoint(1000)).unwrap().id, first);
    assert_eq!(q.pop_due(TimePoint(1000)).unwrap().id, second);
}

#[test]
fn cancelled_timers_never_fire() {
    let mut q = TimerQueue::new();
    let id = q.schedule(A, TimerKind::SlideAdvance, TimePoint(0), Duration::from_secs(1));
    assert!(q.cancel(id));
    assert!(!q.cancel(id));
    assert_eq!(q.next_deadline(), None);
    assert!(q.pop_due(TimePoint(10_000)).is_none());
}

#[test]
fn cancel_owner_only_touches_that_owner() {
    let mut q = TimerQueue::new();
    q.schedule(A, TimerKind::SlideAdvance, TimePoint(0), Duration::from_secs(1));
    q.schedule(A, TimerKind::ErrorSkip, TimePoint(0), Duration::from_secs(2));
    let keep = q.schedule(B, TimerKind::SlideAdvance, TimePoint(0), Duration::from_secs(3));
    assert_eq!(q.pending_for(A), 2);
    assert_eq!(q.cancel_owner(A), 2);
    assert_eq!(q.len(), 1);
    assert_eq!(q.pop_due(TimePoint(10_000)).unwrap().id, keep);
}

#[test]
fn zero_and_sub_millisecond_delays_fire_one_millisecond_later() {
    let mut q = TimerQueue::new();
    let zero = q.schedule(A, TimerKind::ErrorSkip, TimePoint(40), Duration::ZERO);
    let tiny = q.schedule(B, TimerKind::SlideAdvance, TimePoint(40), Duration::from_micros(400));
    assert!(q.pop_due(TimePoint(40)).is_none());
    assert_eq!(q.next_deadline(), Some(TimePoint(41)));
    assert_eq!(q.pop_due(TimePoint(41)).unwrap().id, zero);
    assert_eq!(q.pop_due(TimePoint(41)).unwrap().id, tiny);
}
