//! Base support for message producers - output wiring, lifecycle gate and
//! observation of each send
use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use crate::message::Message;
use crate::message_sink::MessageSink;
use crate::observation::{NoopObservationRegistry, Observation, ObservationRegistry};

/// Start/stop lifecycle for components which must be started before use
pub trait Lifecycle {
    fn start(&self) -> Result<()>;
    fn stop(&self);
    fn is_running(&self) -> bool;
}

/// Producer support
/// Holds the output the producer sends to, and the observation registry
/// each send is reported to
pub struct ProducerSupport {
    /// Component name, used as the observation name
    name: String,

    /// Where messages go
    output: Option<Arc<dyn MessageSink>>,

    /// Observation registry - no-op unless told otherwise
    registry: Arc<dyn ObservationRegistry>,

    /// Lifecycle flag
    running: AtomicBool,
}

impl ProducerSupport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            output: None,
            registry: NoopObservationRegistry::shared(),
            running: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_output(&mut self, output: Arc<dyn MessageSink>) {
        self.output = Some(output);
    }

    pub fn register_observation_registry(&mut self, registry: Arc<dyn ObservationRegistry>) {
        self.registry = registry;
    }

    /// True if sends are being reported to a real registry
    pub fn is_observed(&self) -> bool {
        !self.registry.is_noop()
    }

    /// Send a message to the output, inline
    /// Does not check the lifecycle flag - that is up to the producer
    pub fn send_message(&self, message: &Message) -> Result<()> {
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| anyhow!("No output set for producer '{}'", self.name))?;

        // Optimized builds bypass observation completely for a no-op registry
        #[cfg(feature = "optimized")]
        if self.registry.is_noop() {
            return output.handle(message);
        }

        let observation = Observation::start(self.registry.as_ref(), &self.name);
        let result = output.handle(message);
        observation.stop(result.is_err());
        result
    }
}

impl Lifecycle for ProducerSupport {
    fn start(&self) -> Result<()> {
        if self.output.is_none() {
            return Err(anyhow!("An output is required to start producer '{}'", self.name));
        }

        if !self.running.swap(true, Ordering::AcqRel) {
            debug!("Started producer '{}'", self.name);
        }
        Ok(())
    }

    fn stop(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            debug!("Stopped producer '{}'", self.name);
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

// -- Tests --
#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::MessageCounter;
    use crate::message_sink::FnSink;
    use arcstr::ArcStr;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Capture {
        records: Mutex<Vec<(String, bool)>>,
    }

    impl ObservationRegistry for Capture {
        fn record(&self, name: &str, _elapsed: Duration, failed: bool) {
            self.records.lock().unwrap().push((name.to_string(), failed));
        }
    }

    struct Failing;

    impl MessageSink for Failing {
        fn handle(&self, _message: &Message) -> Result<()> {
            Err(anyhow!("rejected"))
        }
    }

    fn counting_support() -> (ProducerSupport, Arc<MessageCounter>) {
        let counter = Arc::new(MessageCounter::new());
        let sink_counter = counter.clone();
        let mut support = ProducerSupport::new("test");
        support.set_output(Arc::new(FnSink::new(move |_: &Message| {
            sink_counter.increment();
        })));
        (support, counter)
    }

    #[test]
    fn start_requires_output() {
        let support = ProducerSupport::new("test");
        assert!(support.start().is_err());
        assert!(!support.is_running());
    }

    #[test]
    fn lifecycle_flag_follows_start_and_stop() {
        let (support, _) = counting_support();
        assert!(!support.is_running());

        support.start().unwrap();
        assert!(support.is_running());

        // Idempotent
        support.start().unwrap();
        assert!(support.is_running());

        support.stop();
        assert!(!support.is_running());
        support.stop();
        assert!(!support.is_running());
    }

    #[test]
    fn send_without_output_is_an_error() {
        let support = ProducerSupport::new("test");
        assert!(support.send_message(&Message::new(ArcStr::from("x"))).is_err());
    }

    #[test]
    fn send_reaches_output() {
        let (support, counter) = counting_support();
        support.send_message(&Message::new(ArcStr::from("x"))).unwrap();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn default_registry_is_not_observed() {
        let (support, _) = counting_support();
        assert!(!support.is_observed());
    }

    #[test]
    fn observed_sends_are_recorded() {
        let (mut support, _) = counting_support();
        let registry = Arc::new(Capture::default());
        support.register_observation_registry(registry.clone());
        assert!(support.is_observed());

        support.send_message(&Message::new(ArcStr::from("x"))).unwrap();
        support.send_message(&Message::new(ArcStr::from("y"))).unwrap();

        assert_eq!(*registry.records.lock().unwrap(),
                   vec![("test".to_string(), false), ("test".to_string(), false)]);
    }

    #[test]
    fn failed_sends_are_recorded_as_failed() {
        let mut support = ProducerSupport::new("test");
        support.set_output(Arc::new(Failing));
        let registry = Arc::new(Capture::default());
        support.register_observation_registry(registry.clone());

        assert!(support.send_message(&Message::new(ArcStr::from("x"))).is_err());
        assert_eq!(*registry.records.lock().unwrap(), vec![("test".to_string(), true)]);
    }
}
