// Timer stop signal

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Read side, polled by the timer generator once per period
pub struct StopToken {
    flag: Arc<AtomicBool>,
}

impl StopToken {
    /// Check if stop was requested
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Write side, held by the dispatch thread
pub struct StopSender {
    flag: Arc<AtomicBool>,
}

impl StopSender {
    /// Signal stop; never blocks
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

/// Create a stop channel
pub fn stop_channel() -> (StopSender, StopToken) {
    let flag = Arc::new(AtomicBool::new(false));
    (
        StopSender {
            flag: Arc::clone(&flag),
        },
        StopToken { flag },
    )
}
