// Port Layer - Interfaces the application supplies to a worker

pub mod handler;

// Re-exports
pub use handler::{LogHandler, MessageHandler};
