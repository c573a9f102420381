//! Messages the daemon posts after starting its workers

use anyhow::{bail, Context, Result};
use msgloop_core::Envelope;
use serde::Deserialize;

/// One payload addressed to a worker by name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Posting {
    pub worker: String,
    #[serde(flatten)]
    pub envelope: Envelope,
}

/// Parse a JSON array of `{"worker": .., "text": .., "value": ..}`
pub fn parse_postings(json: &str) -> Result<Vec<Posting>> {
    serde_json::from_str(json).context("Invalid message script (expected a JSON array)")
}

/// "Hello world" to the first worker, "Goodbye world" to the second
pub fn default_postings(workers: &[String]) -> Vec<Posting> {
    workers
        .iter()
        .zip(["Hello world", "Goodbye world"])
        .map(|(worker, text)| Posting {
            worker: worker.clone(),
            envelope: Envelope::new(text, 2017),
        })
        .collect()
}

/// Every posting must address a configured worker
pub fn check_targets(postings: &[Posting], workers: &[String]) -> Result<()> {
    for posting in postings {
        if !workers.iter().any(|w| *w == posting.worker) {
            bail!("Message addressed to unknown worker: {}", posting.worker);
        }
    }
    Ok(())
}
