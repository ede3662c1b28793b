#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A gossip message as seen by the tracker.
///
/// Only `id` takes part in deduplication; `origin` and `payload` are carried
/// along for the caller and never inspected.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    pub id: String,
    /// Peer that produced or forwarded the message
    pub origin: String,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        origin: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            id: id.into(),
            origin: origin.into(),
            payload: payload.into(),
        }
    }
}
