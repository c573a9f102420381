// Application Layer - Worker lifecycle and dispatch

pub mod worker;

// Re-exports
pub use worker::{RunState, ShutdownSummary, Worker, WorkerConfig};
