// Envelope Domain Model

use serde::{Deserialize, Serialize};

/// Application payload carried through a worker's queue.
///
/// The queue never looks inside; only the registered handler does. Fields are
/// private so a value cannot change once it has been posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    text: String,
    value: i32,
}

impl Envelope {
    pub fn new(text: impl Into<String>, value: i32) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.text, self.value)
    }
}
