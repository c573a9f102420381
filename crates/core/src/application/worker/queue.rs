// Message queue shared between producers and the dispatch thread

use crate::domain::Message;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::ThreadId;

/// Lifecycle of a worker as seen by its producers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, dispatch thread not started; posts are queued
    Idle,
    /// Dispatch loop running
    Running,
    /// Shutdown requested; posts are rejected
    ExitRequested,
    /// Dispatch thread joined and queue drained
    Exited,
}

impl RunState {
    pub fn accepts_posts(self) -> bool {
        matches!(self, RunState::Idle | RunState::Running)
    }
}

struct QueueState {
    messages: VecDeque<Message>,
    run_state: RunState,
    dispatch_thread: Option<ThreadId>,
}

/// Unbounded FIFO guarded by one mutex, paired with one condvar.
///
/// The exit flag lives under the same lock as the messages so that accepting a
/// post and observing shutdown can never interleave.
pub(crate) struct MessageQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                messages: VecDeque::new(),
                run_state: RunState::Idle,
                dispatch_thread: None,
            }),
            available: Condvar::new(),
        }
    }

    // Handlers run outside the lock, so a poisoned guard still holds a consistent queue.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue unless shutdown has been requested. Returns whether it was accepted.
    pub fn post(&self, message: Message) -> bool {
        let mut state = self.lock();
        if !state.run_state.accepts_posts() {
            return false;
        }
        state.messages.push_back(message);
        self.available.notify_one();
        true
    }

    /// Enqueue regardless of the run state (timer generator)
    pub fn push(&self, message: Message) {
        let mut state = self.lock();
        state.messages.push_back(message);
        self.available.notify_one();
    }

    /// Queue the shutdown request behind everything already posted and close
    /// the queue to further posts. Returns false if shutdown was already requested.
    pub fn request_exit(&self) -> bool {
        let mut state = self.lock();
        if !state.run_state.accepts_posts() {
            return false;
        }
        state.messages.push_back(Message::ShutdownRequest);
        state.run_state = RunState::ExitRequested;
        self.available.notify_one();
        true
    }

    /// Called by the dispatch thread before it signals the start rendezvous,
    /// so its identity is known before the first message is handled
    pub fn mark_running(&self, dispatch_thread: ThreadId) {
        let mut state = self.lock();
        state.dispatch_thread = Some(dispatch_thread);
        if state.run_state == RunState::Idle {
            state.run_state = RunState::Running;
        }
    }

    /// Block until a message is available and pop it
    pub fn pop_blocking(&self) -> Message {
        let mut state = self.lock();
        loop {
            // Re-checked after every wake; spurious wakeups fall through to wait again.
            if let Some(message) = state.messages.pop_front() {
                return message;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Discard everything left and mark the queue exited. Returns the discarded count.
    pub fn drain(&self) -> usize {
        let mut state = self.lock();
        let discarded = state.messages.len();
        state.messages.clear();
        state.run_state = RunState::Exited;
        state.dispatch_thread = None;
        discarded
    }

    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn run_state(&self) -> RunState {
        self.lock().run_state
    }

    pub fn dispatch_thread(&self) -> Option<ThreadId> {
        self.lock().dispatch_thread
    }
}
