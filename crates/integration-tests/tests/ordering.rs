//! Global FIFO ordering per worker

use msgloop_core::port::handler::mocks::RecordingHandler;
use msgloop_core::{Envelope, Worker, WorkerConfig};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn quiet() -> WorkerConfig {
    WorkerConfig::default().without_timer()
}

/// N posts from one producer before consumption begins arrive in posting order
#[test]
fn test_fifo_single_producer_before_start() {
    let recorder = RecordingHandler::new();
    let worker = Worker::with_config("fifo", quiet(), recorder.clone()).unwrap();

    for i in 0..500 {
        worker.post(Envelope::new(format!("msg-{}", i), i));
    }
    worker.start().unwrap();
    worker.shutdown().unwrap();

    let values: Vec<i32> = recorder.payloads().iter().map(Envelope::value).collect();
    assert_eq!(values, (0..500).collect::<Vec<_>>());
}

#[test]
fn test_fifo_single_producer_while_running() {
    let recorder = RecordingHandler::new();
    let worker = Worker::with_config("fifo-live", quiet(), recorder.clone()).unwrap();
    worker.start().unwrap();

    for i in 0..500 {
        worker.post(Envelope::new("n", i));
    }
    let summary = worker.shutdown().unwrap();

    assert_eq!(summary.dispatched, 500);
    let values: Vec<i32> = recorder.payloads().iter().map(Envelope::value).collect();
    assert_eq!(values, (0..500).collect::<Vec<_>>());
}

/// With several producers, each producer's own posts stay in order and nothing is lost
#[test]
fn test_multiple_producers_keep_per_producer_order() {
    const PRODUCERS: i32 = 4;
    const PER_PRODUCER: i32 = 200;

    let recorder = RecordingHandler::new();
    let worker = Arc::new(Worker::with_config("multi", quiet(), recorder.clone()).unwrap());
    worker.start().unwrap();

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let worker = Arc::clone(&worker);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    worker.post(Envelope::new(format!("p{}", p), i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    worker.shutdown().unwrap();

    let payloads = recorder.payloads();
    assert_eq!(payloads.len(), (PRODUCERS * PER_PRODUCER) as usize);
    for p in 0..PRODUCERS {
        let tag = format!("p{}", p);
        let seen: Vec<i32> = payloads
            .iter()
            .filter(|e| e.text() == tag)
            .map(Envelope::value)
            .collect();
        assert_eq!(seen, (0..PER_PRODUCER).collect::<Vec<_>>(), "producer {}", p);
    }
}

/// A slow handler does not block producers; they keep queueing behind it
#[test]
fn test_slow_handler_does_not_block_post() {
    let recorder = RecordingHandler::new().with_delay(Duration::from_millis(50));
    let worker = Worker::with_config("slow", quiet(), recorder.clone()).unwrap();
    worker.start().unwrap();

    let started = std::time::Instant::now();
    for i in 0..5 {
        worker.post(Envelope::new("slow", i));
    }
    assert!(started.elapsed() < Duration::from_millis(50));

    worker.shutdown().unwrap();
    assert_eq!(recorder.payload_count(), 5);
}
