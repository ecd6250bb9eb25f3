//! MessageSink trait for anything which consumes messages from a channel
use anyhow::Result;
use crate::message::Message;

/// A consumer of messages
/// Called inline by the channel, in the sender's call stack
pub trait MessageSink: Send + Sync {
    /// Handle one message
    fn handle(&self, message: &Message) -> Result<()>;
}

/// Adapter to use a simple closure as a sink
pub struct FnSink<F>
where
    F: Fn(&Message) + Send + Sync,
{
    func: F,
}

impl<F> FnSink<F>
where
    F: Fn(&Message) + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> MessageSink for FnSink<F>
where
    F: Fn(&Message) + Send + Sync,
{
    fn handle(&self, message: &Message) -> Result<()> {
        (self.func)(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcstr::ArcStr;
    use std::sync::Mutex;

    #[test]
    fn closure_sink_sees_every_payload() {
        let seen = Mutex::new(Vec::new());
        let sink = FnSink::new(|message: &Message| {
            seen.lock().unwrap().push(message.payload().to_string());
        });

        sink.handle(&Message::new(ArcStr::from("one"))).unwrap();
        sink.handle(&Message::new(ArcStr::from("two"))).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["one", "two"]);
    }
}
