// Domain Layer - Values that flow through a worker's queue

pub mod envelope;
pub mod message;

// Re-exports
pub use envelope::Envelope;
pub use message::Message;
