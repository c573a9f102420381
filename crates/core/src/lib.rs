// Msgloop Core - Worker threads, message queue and dispatch loop
// NO async runtime, NO I/O - only std threads, one lock and one condvar per worker

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::worker::{RunState, ShutdownSummary, Worker, WorkerConfig};
pub use domain::{Envelope, Message};
pub use error::{Result, WorkerError};
pub use port::{LogHandler, MessageHandler};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
