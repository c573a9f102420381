// Named thread spawning

use crate::error::{Result, WorkerError};
use std::thread::{self, JoinHandle};
use tracing::warn;

/// Spawn a thread named `name` so it shows up in debuggers and `top -H`.
///
/// A name the OS cannot carry (interior NUL) is not fatal: the thread is
/// spawned unnamed and a warning is logged.
pub(crate) fn spawn_named<F, T>(name: &str, f: F) -> Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let builder = if name.contains('\0') {
        warn!(
            thread_name = %name.escape_debug(),
            "Thread name contains a NUL byte, spawning unnamed thread"
        );
        thread::Builder::new()
    } else {
        thread::Builder::new().name(name.to_string())
    };

    builder.spawn(f).map_err(|source| WorkerError::Spawn {
        name: name.to_string(),
        source,
    })
}
