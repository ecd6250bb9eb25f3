// Channel benchmark messaging SDK - main library exports
pub mod message;
pub mod message_sink;
pub mod direct_channel;
pub mod counter;
pub mod observation;
pub mod producer_support;
pub mod config;

// Flattened re-exports
pub use self::message::Message;
pub use self::message::MessageHeaders;
pub use self::message_sink::MessageSink;
pub use self::message_sink::FnSink;
pub use self::direct_channel::DirectChannel;
pub use self::counter::MessageCounter;
pub use self::observation::{NoopObservationRegistry, Observation, ObservationRegistry};
pub use self::producer_support::{Lifecycle, ProducerSupport};

/// SDK package version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
