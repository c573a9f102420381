//! Timer generator liveness and stop behaviour

use msgloop_core::port::handler::mocks::{Dispatched, RecordingHandler};
use msgloop_core::{Envelope, Worker, WorkerConfig};
use std::thread;
use std::time::{Duration, Instant};

/// Idle consumer over a window W sees floor(W / period) ticks, give or take one
#[test]
fn test_timer_liveness() {
    let period = Duration::from_millis(50);
    let recorder = RecordingHandler::new();
    let worker = Worker::with_config(
        "ticker",
        WorkerConfig::default().with_timer_period(period),
        recorder.clone(),
    )
    .unwrap();

    // The window is measured around the whole run rather than assumed from the
    // sleep, so oversleeping the test thread does not skew the expectation.
    let opened = Instant::now();
    worker.start().unwrap();
    thread::sleep(Duration::from_millis(300));
    let ticks = recorder.timer_count() as i64;
    let window = opened.elapsed();
    worker.shutdown().unwrap();

    let expected = (window.as_millis() / period.as_millis()) as i64;
    assert!(
        (expected - 1..=expected + 1).contains(&ticks),
        "expected {} +/- 1 ticks over {:?}, got {}",
        expected,
        window,
        ticks
    );
}

#[test]
fn test_ticks_tagged_with_worker_name() {
    let recorder = RecordingHandler::new();
    let worker = Worker::with_config(
        "tagged",
        WorkerConfig::default().with_timer_period(Duration::from_millis(10)),
        recorder.clone(),
    )
    .unwrap();
    worker.start().unwrap();
    thread::sleep(Duration::from_millis(60));
    worker.shutdown().unwrap();

    let events = recorder.events();
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| *e
        == Dispatched::Timer {
            worker: "tagged".to_string()
        }));
}

#[test]
fn test_no_ticks_when_disabled() {
    let recorder = RecordingHandler::new();
    let worker =
        Worker::with_config("silent", WorkerConfig::default().without_timer(), recorder.clone())
            .unwrap();
    worker.start().unwrap();
    thread::sleep(Duration::from_millis(50));
    let summary = worker.shutdown().unwrap();

    assert_eq!(recorder.timer_count(), 0);
    assert_eq!(summary.timer_ticks, 0);
}

/// Ticks and payloads interleave in one queue; payload order is unaffected
#[test]
fn test_ticks_interleave_with_payloads() {
    let recorder = RecordingHandler::new();
    let worker = Worker::with_config(
        "mixed",
        WorkerConfig::default().with_timer_period(Duration::from_millis(5)),
        recorder.clone(),
    )
    .unwrap();
    worker.start().unwrap();

    for i in 0..20 {
        worker.post(Envelope::new("m", i));
        thread::sleep(Duration::from_millis(2));
    }
    worker.shutdown().unwrap();

    let values: Vec<i32> = recorder.payloads().iter().map(Envelope::value).collect();
    assert_eq!(values, (0..20).collect::<Vec<_>>());
    assert!(recorder.timer_count() > 0);
}

/// Shutdown waits at most about one timer period for the generator to notice
#[test]
fn test_shutdown_latency_bounded_by_period() {
    let period = Duration::from_millis(100);
    let worker = Worker::with_config(
        "latency",
        WorkerConfig::default().with_timer_period(period),
        RecordingHandler::new(),
    )
    .unwrap();
    worker.start().unwrap();

    let started = Instant::now();
    worker.shutdown().unwrap();
    assert!(started.elapsed() < period * 3);
}
