// Timer generator - periodic TimerTick producer

use super::constants::TIMER_THREAD_SUFFIX;
use super::queue::MessageQueue;
use super::shutdown::{stop_channel, StopSender, StopToken};
use super::spawn::spawn_named;
use crate::domain::Message;
use crate::error::Result;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

/// Subordinate thread that sleeps one period and then enqueues a tick.
///
/// There is no catch-up and no flow control: a slow consumer simply sees ticks
/// pile up in its queue. The stop flag is checked once per period, so stopping
/// can take up to one full period.
pub(crate) struct TimerGenerator {
    worker: Arc<str>,
    stop: StopSender,
    handle: JoinHandle<u64>,
}

impl TimerGenerator {
    pub fn spawn(worker: Arc<str>, period: Duration, queue: Arc<MessageQueue>) -> Result<Self> {
        let (stop, token) = stop_channel();
        let thread_name = format!("{}{}", worker, TIMER_THREAD_SUFFIX);
        let handle = spawn_named(&thread_name, move || run(period, &queue, &token))?;

        debug!(worker = %worker, period_ms = period.as_millis() as u64, "Timer started");
        Ok(Self {
            worker,
            stop,
            handle,
        })
    }

    /// Signal stop and wait for the thread. Returns the number of ticks produced.
    pub fn stop(self) -> u64 {
        self.stop.stop();
        match self.handle.join() {
            Ok(ticks) => {
                debug!(worker = %self.worker, ticks, "Timer stopped");
                ticks
            }
            Err(_) => {
                error!(worker = %self.worker, "Timer thread panicked");
                0
            }
        }
    }
}

fn run(period: Duration, queue: &MessageQueue, token: &StopToken) -> u64 {
    let mut ticks = 0;
    while !token.is_stopped() {
        thread::sleep(period);
        queue.push(Message::TimerTick);
        ticks += 1;
    }
    ticks
}
