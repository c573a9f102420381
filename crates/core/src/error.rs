// Central Error Type for the Worker

use thiserror::Error;

/// Worker-level error type
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn thread for worker {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker {0} exited before signalling start")]
    StartAborted(String),

    #[error("Worker {0} is shutting down, message rejected")]
    ShuttingDown(String),

    #[error("Worker {0} cannot be started again")]
    NotRestartable(String),

    #[error("Worker {0} cannot be shut down from its own dispatch thread")]
    SelfShutdown(String),

    #[error("Dispatch thread of worker {0} panicked")]
    ThreadPanicked(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using WorkerError
pub type Result<T> = std::result::Result<T, WorkerError>;
