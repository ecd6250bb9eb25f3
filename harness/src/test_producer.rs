//! Test message producer - wraps payloads and sends them down the output
//! channel, counting each one
use anyhow::Result;
use arcstr::ArcStr;
use channel_bench_sdk::{
    DirectChannel, Lifecycle, Message, MessageCounter, ObservationRegistry, ProducerSupport,
};
use std::sync::Arc;

const COMPONENT_TYPE: &str = "test-message-producer";

/// Producer used to drive the benchmark
pub struct TestMessageProducer {
    support: ProducerSupport,
    sent: MessageCounter,
}

impl TestMessageProducer {
    pub fn new() -> Self {
        Self {
            support: ProducerSupport::new(COMPONENT_TYPE),
            sent: MessageCounter::new(),
        }
    }

    pub fn component_type(&self) -> &'static str {
        COMPONENT_TYPE
    }

    pub fn set_output_channel(&mut self, channel: Arc<DirectChannel>) {
        self.support.set_output(channel);
    }

    pub fn register_observation_registry(&mut self, registry: Arc<dyn ObservationRegistry>) {
        self.support.register_observation_registry(registry);
    }

    pub fn is_observed(&self) -> bool {
        self.support.is_observed()
    }

    /// Send one test message
    /// Silently ignored unless the producer has been started
    pub fn send(&self, payload: &ArcStr) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }

        let message = Message::new(payload.clone());
        self.support.send_message(&message)?;
        self.sent.increment();
        Ok(())
    }

    /// Messages sent since creation or the last reset
    pub fn count(&self) -> u64 {
        self.sent.get()
    }

    pub fn reset(&self) {
        self.sent.reset();
    }
}

impl Default for TestMessageProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle for TestMessageProducer {
    fn start(&self) -> Result<()> {
        self.support.start()
    }

    fn stop(&self) {
        self.support.stop()
    }

    fn is_running(&self) -> bool {
        self.support.is_running()
    }
}
