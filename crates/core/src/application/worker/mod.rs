// Worker - Named dispatch thread with a FIFO message queue

pub mod constants;
mod config;
mod dispatch;
mod panic_guard;
mod queue;
mod shutdown;
mod spawn;
mod timer;

pub use config::WorkerConfig;
pub use panic_guard::{execute_guarded, PanicGuardResult};
pub use queue::RunState;

use crate::domain::Envelope;
use crate::error::{Result, WorkerError};
use crate::port::{LogHandler, MessageHandler};
use dispatch::{DispatchLoop, DispatchOutcome};
use queue::MessageQueue;
use spawn::spawn_named;
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, error, info, warn};

/// What a completed shutdown observed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownSummary {
    /// Payloads handed to the handler
    pub dispatched: u64,
    /// Ticks produced by the timer generator
    pub timer_ticks: u64,
    /// Messages left behind the shutdown request and thrown away
    pub discarded: usize,
    /// Handler calls that panicked
    pub handler_panics: u64,
}

/// Who owns the dispatch thread, as seen by start() and shutdown()
enum Phase {
    /// Not started; the handler waits here until start() moves it onto the thread
    Idle(Box<dyn MessageHandler>),
    Running(JoinHandle<DispatchOutcome>),
    /// One caller is joining the thread; others wait on `stopped`
    Stopping,
    Stopped,
}

/// Independent execution context: one dispatch thread, one timer thread, one queue.
///
/// Workers share nothing with each other. Messages posted to one worker are
/// dispatched in exactly the order they were accepted, across all producers.
pub struct Worker {
    name: Arc<str>,
    config: WorkerConfig,
    queue: Arc<MessageQueue>,
    // Never held across a join.
    phase: Mutex<Phase>,
    stopped: Condvar,
}

impl Worker {
    /// Create an idle worker that logs what it receives
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_handler(name, LogHandler)
    }

    /// Create an idle worker with a custom handler and the default config
    pub fn with_handler(name: impl Into<String>, handler: impl MessageHandler) -> Self {
        Self::build(name.into(), WorkerConfig::default(), Box::new(handler))
    }

    /// Create an idle worker with a custom handler and config
    pub fn with_config(
        name: impl Into<String>,
        config: WorkerConfig,
        handler: impl MessageHandler,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(name.into(), config, Box::new(handler)))
    }

    fn build(name: String, config: WorkerConfig, handler: Box<dyn MessageHandler>) -> Self {
        Self {
            name: Arc::from(name),
            config,
            queue: Arc::new(MessageQueue::new()),
            phase: Mutex::new(Phase::Idle(handler)),
            stopped: Condvar::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    fn lock_phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn the dispatch thread and wait until its loop is running.
    ///
    /// No-op if already running. A worker that has been shut down (or whose
    /// thread failed to spawn) cannot be started again.
    pub fn start(&self) -> Result<()> {
        let mut phase = self.lock_phase();
        let handler = match std::mem::replace(&mut *phase, Phase::Stopped) {
            Phase::Idle(handler) => handler,
            Phase::Running(handle) => {
                *phase = Phase::Running(handle);
                debug!(worker = %self.name, "Worker already started");
                return Ok(());
            }
            other => {
                *phase = other;
                return Err(WorkerError::NotRestartable(self.name.to_string()));
            }
        };

        let dispatch = DispatchLoop::new(
            Arc::clone(&self.name),
            Arc::clone(&self.queue),
            handler,
            self.config.active_timer_period(),
        );

        // Start rendezvous: the dispatch thread fires this exactly once
        let (started_tx, started_rx) = mpsc::sync_channel(1);
        let handle = spawn_named(&self.name, move || dispatch.run(started_tx))?;

        if started_rx.recv().is_err() {
            let _ = handle.join();
            return Err(WorkerError::StartAborted(self.name.to_string()));
        }
        *phase = Phase::Running(handle);

        info!(
            worker = %self.name,
            timer_period_ms = self.config.timer_period.as_millis() as u64,
            timer_enabled = self.config.timer_enabled,
            "Worker started"
        );
        Ok(())
    }

    /// Post a payload; silently dropped once shutdown has been requested
    pub fn post(&self, envelope: Envelope) {
        if let Err(e) = self.try_post(envelope) {
            debug!(worker = %self.name, error = %e, "Dropping payload");
        }
    }

    /// Post a payload, reporting a rejection instead of dropping it silently
    pub fn try_post(&self, envelope: Envelope) -> Result<()> {
        if self.queue.post(envelope.into()) {
            Ok(())
        } else {
            Err(WorkerError::ShuttingDown(self.name.to_string()))
        }
    }

    /// Stop the worker and wait for its dispatch thread to exit.
    ///
    /// The shutdown request queues behind everything already accepted, so
    /// those messages are still dispatched. Anything that lands behind it is
    /// discarded and counted in the summary. No-op (default summary) if the
    /// worker was never started or is already stopped. A caller that arrives
    /// while another is joining waits for it to finish, then gets the no-op result.
    /// Fails with `SelfShutdown` when called from the dispatch thread.
    pub fn shutdown(&self) -> Result<ShutdownSummary> {
        if self.is_worker_thread() {
            return Err(WorkerError::SelfShutdown(self.name.to_string()));
        }

        let handle = {
            let mut phase = self.lock_phase();
            loop {
                match std::mem::replace(&mut *phase, Phase::Stopping) {
                    Phase::Running(handle) => break handle,
                    Phase::Stopping => {
                        phase = self
                            .stopped
                            .wait(phase)
                            .unwrap_or_else(PoisonError::into_inner);
                    }
                    other => {
                        *phase = other;
                        debug!(worker = %self.name, "Worker not running, shutdown is a no-op");
                        return Ok(ShutdownSummary::default());
                    }
                }
            }
        };

        info!(worker = %self.name, queue_depth = self.queue.len(), "Worker shutdown requested");
        self.queue.request_exit();
        let joined = handle.join();

        let discarded = self.queue.drain();
        *self.lock_phase() = Phase::Stopped;
        self.stopped.notify_all();
        if discarded > 0 {
            warn!(worker = %self.name, discarded, "Discarded messages left after shutdown");
        }

        let outcome = joined.map_err(|_| {
            error!(worker = %self.name, "Dispatch thread panicked");
            WorkerError::ThreadPanicked(self.name.to_string())
        })?;

        let summary = ShutdownSummary {
            dispatched: outcome.dispatched,
            timer_ticks: outcome.timer_ticks,
            discarded,
            handler_panics: outcome.handler_panics,
        };
        info!(
            worker = %self.name,
            dispatched = summary.dispatched,
            timer_ticks = summary.timer_ticks,
            discarded = summary.discarded,
            handler_panics = summary.handler_panics,
            "Worker stopped"
        );
        Ok(summary)
    }

    /// Messages currently queued. A snapshot; advisory only.
    pub fn queue_depth(&self) -> usize {
        self.queue.len()
    }

    pub fn state(&self) -> RunState {
        self.queue.run_state()
    }

    /// Identity of the dispatch thread, None unless running.
    /// Set before the first message is dispatched.
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.queue.dispatch_thread()
    }

    /// Identity of the calling thread
    pub fn current_thread_id() -> ThreadId {
        thread::current().id()
    }

    /// True when called from this worker's dispatch thread
    pub fn is_worker_thread(&self) -> bool {
        self.thread_id() == Some(Self::current_thread_id())
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // The last reference went away inside a handler: the thread cannot join
        // itself, so end its loop after this message and let it run out detached.
        if self.is_worker_thread() {
            self.queue.request_exit();
            warn!(worker = %self.name, "Worker dropped on its own dispatch thread, detaching");
            return;
        }
        if let Err(e) = self.shutdown() {
            error!(worker = %self.name, error = %e, "Worker shutdown on drop failed");
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("queue_depth", &self.queue_depth())
            .finish()
    }
}
