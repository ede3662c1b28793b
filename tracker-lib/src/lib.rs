pub mod message;
pub mod message_tracker;
pub mod metrics;

pub use message::Message;
pub use message_tracker::{FifoMessageTracker, MessageTracker, TrackerError};
