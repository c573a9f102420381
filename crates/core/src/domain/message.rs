// Message Domain Model

use super::Envelope;

/// Entry in a worker's queue.
///
/// The set of variants is closed: the dispatch loop matches exhaustively, so an
/// unrecognised tag cannot reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Application payload, handed to the registered handler
    UserPayload(Envelope),
    /// Produced by the timer generator once per period
    TimerTick,
    /// Stops the timer generator and ends the dispatch loop
    ShutdownRequest,
}

impl Message {
    /// Short tag used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Message::UserPayload(_) => "user_payload",
            Message::TimerTick => "timer_tick",
            Message::ShutdownRequest => "shutdown_request",
        }
    }
}

impl From<Envelope> for Message {
    fn from(envelope: Envelope) -> Self {
        Message::UserPayload(envelope)
    }
}
