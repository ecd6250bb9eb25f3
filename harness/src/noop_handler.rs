//! No-op message handler - counts messages and otherwise ignores them
use anyhow::Result;
use channel_bench_sdk::{Message, MessageCounter, MessageSink};

/// Handler which does nothing with received messages, so the benchmark
/// measures only the pipeline around it
#[derive(Debug, Default)]
pub struct NoOpMessageHandler {
    received: MessageCounter,
}

impl NoOpMessageHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received since creation or the last reset
    pub fn count(&self) -> u64 {
        self.received.get()
    }

    pub fn reset(&self) {
        self.received.reset();
    }
}

impl MessageSink for NoOpMessageHandler {
    fn handle(&self, _message: &Message) -> Result<()> {
        self.received.increment();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcstr::ArcStr;

    #[test]
    fn counts_every_message() {
        let handler = NoOpMessageHandler::new();
        let message = Message::new(ArcStr::from("ignored"));
        for _ in 0..100 {
            handler.handle(&message).unwrap();
        }
        assert_eq!(handler.count(), 100);
    }

    #[test]
    fn reset_zeroes_count() {
        let handler = NoOpMessageHandler::new();
        handler.handle(&Message::new(ArcStr::from("ignored"))).unwrap();
        handler.reset();
        assert_eq!(handler.count(), 0);
    }
}
