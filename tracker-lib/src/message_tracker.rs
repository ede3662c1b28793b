use std::num::NonZeroUsize;

use ringmap::RingMap;
use thiserror::Error;
use tracing::{debug, trace};

use crate::message::Message;
use crate::metrics::{SharedTrackerMetrics, create_shared_metrics};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TrackerError {
    #[error("message not found: {0}")]
    NotFound(String),
    #[error("tracker capacity must be greater than zero")]
    ZeroCapacity,
}

/// Keeps a bounded number of the most recently seen messages, oldest first.
/// Duplicate ids are never stored twice.
pub trait MessageTracker {
    /// Adds a message, evicting the oldest one if the tracker is full.
    /// Returns `false` if a message with the same id is already tracked, in
    /// which case nothing changes.
    fn add(&mut self, message: Message) -> bool;
    /// Removes the message with the given id and returns it
    fn delete(&mut self, id: &str) -> Result<Message, TrackerError>;
    /// Returns the message for the given id. The message stays in the tracker.
    fn message(&self, id: &str) -> Result<&Message, TrackerError>;
    /// Returns tracked messages in FIFO order
    fn messages(&self) -> Vec<&Message>;
}

enum Selection<'a> {
    Oldest,
    Id(&'a str),
}

/// [`MessageTracker`] over a single ring-buffered hash map: entry order is the
/// FIFO order, the hash table is the id index. Evicting the oldest entry is a
/// `pop_front`.
#[derive(Debug)]
pub struct FifoMessageTracker {
    messages: RingMap<String, Message>,
    capacity: NonZeroUsize,
    metrics: SharedTrackerMetrics,
}

impl FifoMessageTracker {
    pub fn new(capacity: usize) -> Result<Self, TrackerError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(TrackerError::ZeroCapacity)?;
        Ok(Self::with_capacity(capacity))
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self::with_metrics(capacity, create_shared_metrics())
    }

    pub fn with_metrics(capacity: NonZeroUsize, metrics: SharedTrackerMetrics) -> Self {
        Self {
            messages: RingMap::with_capacity(capacity.get()),
            capacity,
            metrics,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    /// Iterates over tracked messages, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Message> + ExactSizeIterator + '_ {
        self.messages.values()
    }

    pub fn metrics(&self) -> &SharedTrackerMetrics {
        &self.metrics
    }

    fn remove_entry(&mut self, selection: Selection<'_>) -> Option<Message> {
        match selection {
            Selection::Oldest => self.messages.pop_front().map(|(_, message)| message),
            // shifts the entries behind it, order is kept
            Selection::Id(id) => self.messages.remove(id),
        }
    }
}

impl MessageTracker for FifoMessageTracker {
    fn add(&mut self, message: Message) -> bool {
        if self.messages.contains_key(&message.id) {
            trace!(id = %message.id, origin = %message.origin, "duplicate message ignored");
            self.metrics.increment_duplicates();
            return false;
        }

        if self.messages.len() == self.capacity.get() {
            if let Some(evicted) = self.remove_entry(Selection::Oldest) {
                debug!(id = %evicted.id, "evicted oldest message");
                self.metrics.increment_evicted();
            }
        }

        trace!(id = %message.id, origin = %message.origin, "tracking message");
        self.messages.push_back(message.id.clone(), message);
        self.metrics.increment_added();
        debug_assert!(self.messages.len() <= self.capacity.get());
        true
    }

    fn delete(&mut self, id: &str) -> Result<Message, TrackerError> {
        let Some(message) = self.remove_entry(Selection::Id(id)) else {
            self.metrics.increment_not_found();
            return Err(TrackerError::NotFound(id.to_string()));
        };
        debug!(id, "deleted message");
        self.metrics.increment_deleted();
        Ok(message)
    }

    fn message(&self, id: &str) -> Result<&Message, TrackerError> {
        self.messages
            .get(id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))
    }

    fn messages(&self) -> Vec<&Message> {
        self.messages.values().collect()
    }
}
