use super::*;

#[test]
fn nothing_fires_before_first_interval() {
    let mut q = TimerQueue::new();
    q.register(TimerSpec::every(TimerId(1), 50.0), 0.0);
    assert!(q.drain_due(49.9).is_empty());
    assert_eq!(q.drain_due(50.0), vec![TimerId(1)]);
    assert!(q.drain_due(50.0).is_empty());
}

#[test]
fn missed_intervals_fire_once_each_in_deadline_order() {
    let mut q = TimerQueue::new();
    q.register(TimerSpec::every(TimerId(1), 30.0), 0.0);
    q.register(TimerSpec::every(TimerId(2), 40.0), 0.0);
    // deadlines: 1@30, 2@40, 1@60, 2@80, 1@90
    assert_eq!(
        q.drain_due(95.0),
        vec![TimerId(1), TimerId(2), TimerId(1), TimerId(2), TimerId(1)]
    );
}

#[test]
fn degenerate_intervals_are_raised() {
    let mut q = TimerQueue::new();
    q.register(TimerSpec::every(TimerId(7), 0.0), 0.0);
    assert_eq!(q.drain_due(3.0).len(), 3);
    q.register(TimerSpec::every(TimerId(7), f64::NAN), 0.0);
    assert_eq!(q.len(), 1);
    assert_eq!(q.drain_due(2.0).len(), 2);
}

#[test]
fn cancel_and_clear_remove_timers() {
    let mut q = TimerQueue::new();
    q.register(TimerSpec::every(TimerId(1), 10.0), 0.0);
    q.register(TimerSpec::every(TimerId(2), 10.0), 0.0);
    assert!(q.cancel(TimerId(1)));
    assert!(!q.cancel(TimerId(1)));
    assert_eq!(q.drain_due(10.0), vec![TimerId(2)]);
    q.clear();
    assert!(q.is_empty());
    assert!(q.drain_due(1000.0).is_empty());
}

#[test]
fn long_stalls_fire_a_bounded_number_of_catch_ups() {
    let mut q = TimerQueue::new();
    q.register(TimerSpec::every(TimerId(3), 50.0), 0.0);
    // 2 million intervals behind.
    assert_eq!(q.drain_due(100_000_000.0).len(), MAX_CATCH_UP);
    // The schedule resumes from the present, not from the skipped deadlines.
    assert!(q.drain_due(100_000_000.0).is_empty());
    assert_eq!(q.drain_due(100_000_050.0), vec![TimerId(3)]);
}
