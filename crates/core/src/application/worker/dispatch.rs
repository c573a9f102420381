// Dispatch loop - runs on the worker's own thread

use super::panic_guard::{execute_guarded, PanicGuardResult};
use super::queue::MessageQueue;
use super::timer::TimerGenerator;
use crate::domain::Message;
use crate::port::MessageHandler;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc::SyncSender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error};

/// Counters reported back to `shutdown()` through the join handle
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DispatchOutcome {
    pub dispatched: u64,
    pub timer_ticks: u64,
    pub handler_panics: u64,
}

pub(crate) struct DispatchLoop {
    worker: Arc<str>,
    queue: Arc<MessageQueue>,
    handler: Box<dyn MessageHandler>,
    timer_period: Option<Duration>,
}

impl DispatchLoop {
    pub fn new(
        worker: Arc<str>,
        queue: Arc<MessageQueue>,
        handler: Box<dyn MessageHandler>,
        timer_period: Option<Duration>,
    ) -> Self {
        Self {
            worker,
            queue,
            handler,
            timer_period,
        }
    }

    /// Thread entry point. Records its identity and marks the queue running,
    /// signals `started`, then dispatches until a `ShutdownRequest` comes up in its turn.
    pub fn run(mut self, started: SyncSender<()>) -> DispatchOutcome {
        self.queue.mark_running(thread::current().id());
        // The caller may have given up waiting; nothing to do about it here.
        let _ = started.send(());

        let timer = self.timer_period.and_then(|period| {
            match TimerGenerator::spawn(Arc::clone(&self.worker), period, Arc::clone(&self.queue)) {
                Ok(timer) => Some(timer),
                Err(e) => {
                    error!(worker = %self.worker, error = %e, "Failed to start timer, running without ticks");
                    None
                }
            }
        });

        let mut outcome = DispatchOutcome::default();
        loop {
            let message = self.queue.pop_blocking();
            debug!(worker = %self.worker, kind = message.kind(), "Dispatching message");

            let guarded = match message {
                Message::UserPayload(envelope) => {
                    outcome.dispatched += 1;
                    let handler = &mut self.handler;
                    let worker = &*self.worker;
                    execute_guarded(
                        worker,
                        AssertUnwindSafe(|| handler.on_payload(worker, envelope)),
                    )
                }
                Message::TimerTick => {
                    let handler = &mut self.handler;
                    let worker = &*self.worker;
                    execute_guarded(worker, AssertUnwindSafe(|| handler.on_timer(worker)))
                }
                Message::ShutdownRequest => {
                    if let Some(timer) = timer {
                        outcome.timer_ticks = timer.stop();
                    }
                    return outcome;
                }
            };

            if let PanicGuardResult::Panicked(_) = guarded {
                outcome.handler_panics += 1;
            }
        }
    }
}
