// Worker constants (no magic values)
use std::time::Duration;

/// Default interval between timer ticks (250ms)
pub const DEFAULT_TIMER_PERIOD: Duration = Duration::from_millis(250);

/// Appended to the worker name to name its timer thread
pub const TIMER_THREAD_SUFFIX: &str = "-timer";
