//! Direct channel - synchronous, same-thread dispatch to a single subscriber
use anyhow::{anyhow, bail, Result};
use std::sync::Arc;
use tracing::debug;
use crate::message::Message;
use crate::message_sink::MessageSink;

/// Direct channel
/// send() runs the subscriber's handle() inline, in the caller's stack,
/// with no queueing
pub struct DirectChannel {
    /// Name for diagnostics
    name: String,

    /// The one subscriber, if any
    subscriber: Option<Arc<dyn MessageSink>>,
}

impl DirectChannel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscriber: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach the subscriber - only one is allowed
    pub fn subscribe(&mut self, sink: Arc<dyn MessageSink>) -> Result<()> {
        if self.subscriber.is_some() {
            bail!("Channel '{}' already has a subscriber", self.name);
        }

        debug!("Subscribing to channel '{}'", self.name);
        self.subscriber = Some(sink);
        Ok(())
    }

    /// Detach the subscriber, returning it
    pub fn unsubscribe(&mut self) -> Option<Arc<dyn MessageSink>> {
        debug!("Unsubscribing from channel '{}'", self.name);
        self.subscriber.take()
    }

    pub fn has_subscriber(&self) -> bool {
        self.subscriber.is_some()
    }

    /// Dispatch a message to the subscriber, inline
    pub fn send(&self, message: &Message) -> Result<()> {
        match &self.subscriber {
            Some(sink) => sink.handle(message),
            None => Err(anyhow!(
                "Dispatcher has no subscribers for channel '{}'",
                self.name
            )),
        }
    }
}

impl MessageSink for DirectChannel {
    fn handle(&self, message: &Message) -> Result<()> {
        self.send(message)
    }
}

// -- Tests --
#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::MessageCounter;
    use crate::message_sink::FnSink;
    use arcstr::ArcStr;
    use std::thread;
    use std::thread::ThreadId;
    use std::sync::Mutex;

    fn message() -> Message {
        Message::new(ArcStr::from("test"))
    }

    #[test]
    fn send_without_subscriber_is_an_error() {
        let channel = DirectChannel::new("output");
        let err = channel.send(&message()).unwrap_err();
        assert!(err.to_string().contains("no subscribers"));
        assert!(err.to_string().contains("'output'"));
    }

    #[test]
    fn send_reaches_subscriber_once() {
        let counter = Arc::new(MessageCounter::new());
        let sink_counter = counter.clone();

        let mut channel = DirectChannel::new("output");
        channel.subscribe(Arc::new(FnSink::new(move |_: &Message| {
            sink_counter.increment();
        }))).unwrap();

        channel.send(&message()).unwrap();
        assert_eq!(counter.get(), 1);
        channel.send(&message()).unwrap();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn dispatch_runs_on_the_sending_thread() {
        let handled_on: Arc<Mutex<Option<ThreadId>>> = Arc::new(Mutex::new(None));
        let recorder = handled_on.clone();

        let mut channel = DirectChannel::new("output");
        channel.subscribe(Arc::new(FnSink::new(move |_: &Message| {
            *recorder.lock().unwrap() = Some(thread::current().id());
        }))).unwrap();

        channel.send(&message()).unwrap();

        // Already recorded by the time send() returns
        assert_eq!(*handled_on.lock().unwrap(), Some(thread::current().id()));
    }

    #[test]
    fn second_subscriber_is_rejected() {
        let mut channel = DirectChannel::new("output");
        channel.subscribe(Arc::new(FnSink::new(|_: &Message| {}))).unwrap();
        assert!(channel.subscribe(Arc::new(FnSink::new(|_: &Message| {}))).is_err());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut channel = DirectChannel::new("output");
        channel.subscribe(Arc::new(FnSink::new(|_: &Message| {}))).unwrap();
        assert!(channel.has_subscriber());

        assert!(channel.unsubscribe().is_some());
        assert!(!channel.has_subscriber());
        assert!(channel.send(&message()).is_err());
    }
}
