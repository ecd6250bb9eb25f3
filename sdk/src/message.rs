//! Generic message envelope passed along a channel
use arcstr::ArcStr;
use chrono::Utc;

/// Headers stamped onto every message at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeaders {
    /// Random message ID
    pub id: u64,

    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl MessageHeaders {
    pub fn new() -> Self {
        Self {
            id: rand::random::<u64>(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

impl Default for MessageHeaders {
    fn default() -> Self {
        Self::new()
    }
}

/// A payload plus its headers
/// The payload is shared, so building a message never copies the string
#[derive(Debug, Clone)]
pub struct Message {
    pub headers: MessageHeaders,
    pub payload: ArcStr,
}

impl Message {
    pub fn new(payload: ArcStr) -> Self {
        Self {
            headers: MessageHeaders::new(),
            payload,
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}
