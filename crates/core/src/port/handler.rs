// Message Handler Port

use crate::domain::Envelope;
use tracing::info;

/// Receives the messages a worker dispatches.
///
/// A handler is moved onto the worker's dispatch thread when the worker starts
/// and is only ever called from that thread, so it needs `Send` but not `Sync`.
pub trait MessageHandler: Send + 'static {
    /// Called once per posted envelope, in posting order
    fn on_payload(&mut self, worker: &str, envelope: Envelope);

    /// Called once per timer tick
    fn on_timer(&mut self, worker: &str);
}

/// Default handler: logs every payload and tick (production)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

impl MessageHandler for LogHandler {
    fn on_payload(&mut self, worker: &str, envelope: Envelope) {
        info!(
            worker = %worker,
            text = %envelope.text(),
            value = envelope.value(),
            "{} on {}",
            envelope,
            worker
        );
    }

    fn on_timer(&mut self, worker: &str) {
        info!(worker = %worker, "Timer expired on {}", worker);
    }
}

/// Test doubles
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// One dispatched call, as seen by the handler
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Dispatched {
        Payload { worker: String, envelope: Envelope },
        Timer { worker: String },
    }

    /// Records every call into a log shared by all clones.
    ///
    /// Keep a clone before handing the handler to a worker and inspect it afterwards.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingHandler {
        log: Arc<Mutex<Vec<Dispatched>>>,
        panic_on: Option<String>,
        delay: Duration,
    }

    impl RecordingHandler {
        pub fn new() -> Self {
            Self::default()
        }

        /// Panic (before recording) on any payload whose text equals `text`
        pub fn with_panic_on(mut self, text: impl Into<String>) -> Self {
            self.panic_on = Some(text.into());
            self
        }

        /// Sleep this long inside every payload call
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn events(&self) -> Vec<Dispatched> {
            self.log.lock().unwrap().clone()
        }

        pub fn payloads(&self) -> Vec<Envelope> {
            self.log
                .lock()
                .unwrap()
                .iter()
                .filter_map(|event| match event {
                    Dispatched::Payload { envelope, .. } => Some(envelope.clone()),
                    Dispatched::Timer { .. } => None,
                })
                .collect()
        }

        pub fn payload_count(&self) -> usize {
            self.payloads().len()
        }

        pub fn timer_count(&self) -> usize {
            self.log
                .lock()
                .unwrap()
                .iter()
                .filter(|event| matches!(event, Dispatched::Timer { .. }))
                .count()
        }
    }

    impl MessageHandler for RecordingHandler {
        fn on_payload(&mut self, worker: &str, envelope: Envelope) {
            if self.panic_on.as_deref() == Some(envelope.text()) {
                panic!("handler refused payload: {}", envelope);
            }
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            self.log.lock().unwrap().push(Dispatched::Payload {
                worker: worker.to_string(),
                envelope,
            });
        }

        fn on_timer(&mut self, worker: &str) {
            self.log.lock().unwrap().push(Dispatched::Timer {
                worker: worker.to_string(),
            });
        }
    }
}
