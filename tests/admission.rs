use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};
use submit_throttle::{AdmissionDecision, AdmissionGate, GateConfig, TimeUnit};

fn gate(capacity: usize, window: Duration) -> AdmissionGate {
    AdmissionGate::new(GateConfig::new(capacity, window).unwrap())
}

#[test]
fn test_five_per_second_then_rollover() {
    let gate = gate(5, Duration::from_secs(1));
    let start = Instant::now();

    let decisions: Vec<_> = (0..6).map(|_| gate.try_admit(start)).collect();
    assert_eq!(
        decisions,
        vec![
            AdmissionDecision::Admitted,
            AdmissionDecision::Admitted,
            AdmissionDecision::Admitted,
            AdmissionDecision::Admitted,
            AdmissionDecision::Admitted,
            AdmissionDecision::Rejected,
        ]
    );

    let after = start + Duration::from_millis(1100);
    assert!(gate.try_admit(after).is_admitted());
    assert_eq!(gate.granted_count(), 1);
    assert_eq!(gate.window().unwrap().window_start, after);
}

#[test]
fn test_rejections_do_not_extend_the_window() {
    let gate = gate(1, Duration::from_secs(1));
    let start = Instant::now();

    assert!(gate.try_admit(start).is_admitted());
    for i in 1..10 {
        assert!(gate
            .try_admit(start + Duration::from_millis(i * 100))
            .is_rejected());
    }

    assert!(gate
        .try_admit(start + Duration::from_millis(1001))
        .is_admitted());
}

#[test]
fn test_unused_slots_do_not_carry_over() {
    let gate = gate(3, Duration::from_secs(1));
    let start = Instant::now();

    assert!(gate.try_admit(start).is_admitted());

    let next = start + Duration::from_secs(2);
    for _ in 0..3 {
        assert!(gate.try_admit(next).is_admitted());
    }
    assert!(gate.try_admit(next).is_rejected());
}

#[test]
fn test_minute_window() {
    let gate = AdmissionGate::new(GateConfig::per_unit(TimeUnit::Minutes, 2).unwrap());
    let start = Instant::now();

    assert!(gate.try_admit(start).is_admitted());
    assert!(gate.try_admit(start + Duration::from_secs(30)).is_admitted());
    assert!(gate.try_admit(start + Duration::from_secs(59)).is_rejected());
    assert!(gate.try_admit(start + Duration::from_secs(61)).is_admitted());
}

#[test]
fn test_concurrent_callers_never_exceed_capacity() {
    const THREADS: usize = 16;
    const CALLS_PER_THREAD: usize = 50;
    const CAPACITY: usize = 25;

    let gate = Arc::new(gate(CAPACITY, Duration::from_secs(3600)));
    let now = Instant::now();
    let barrier = Arc::new(Barrier::new(THREADS));
    let admitted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let barrier = Arc::clone(&barrier);
            let admitted = Arc::clone(&admitted);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..CALLS_PER_THREAD {
                    if gate.try_admit(now).is_admitted() {
                        admitted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(admitted.load(Ordering::Relaxed), CAPACITY);
    assert_eq!(gate.granted_count(), CAPACITY);

    let snapshot = gate.metrics().snapshot();
    assert_eq!(snapshot.admissions_granted, CAPACITY as u64);
    assert_eq!(
        snapshot.admissions_rejected,
        (THREADS * CALLS_PER_THREAD - CAPACITY) as u64
    );
}

#[test]
fn test_concurrent_callers_across_many_windows() {
    const THREADS: usize = 8;
    const WINDOWS: u64 = 20;
    const CAPACITY: usize = 3;

    let window = Duration::from_millis(10);
    let gate = Arc::new(gate(CAPACITY, window));
    let start = Instant::now();

    // Each window is probed at a timestamp well past the previous window's end
    let timestamps: Vec<Instant> = (0..WINDOWS)
        .map(|w| start + Duration::from_millis(w * 20))
        .collect();

    for now in timestamps {
        let barrier = Arc::new(Barrier::new(THREADS));
        let admitted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let barrier = Arc::clone(&barrier);
                let admitted = Arc::clone(&admitted);
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..4 {
                        if gate.try_admit(now).is_admitted() {
                            admitted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(admitted.load(Ordering::Relaxed), CAPACITY);
        assert_eq!(gate.window().unwrap().window_start, now);
    }

    assert_eq!(gate.metrics().windows_rolled(), WINDOWS);
}

#[test]
fn test_window_starts_are_monotonic() {
    let window = Duration::from_millis(100);
    let gate = gate(2, window);
    let start = Instant::now();

    let mut starts = Vec::new();
    for step in 0..50u64 {
        let now = start + Duration::from_millis(step * 37);
        gate.try_admit(now);
        let current = gate.window().unwrap().window_start;
        if starts.last() != Some(&current) {
            starts.push(current);
        }
    }

    assert!(starts.len() > 1);
    for pair in starts.windows(2) {
        assert!(pair[1] > pair[0]);
        assert!(pair[1] - pair[0] >= window);
    }
}
