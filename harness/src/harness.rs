//! Throughput harness for a direct channel pipeline
//! Wires a counting producer to a no-op handler and times how many messages
//! go through in a fixed period

mod benchmark;
pub use benchmark::{throughput, Benchmark, BenchmarkConfig, Measurement, ObservationMode};

mod build_info;
pub use build_info::BuildInfo;

mod noop_handler;
pub use noop_handler::NoOpMessageHandler;

mod recording_registry;
pub use recording_registry::{ObservationSnapshot, RecordingRegistry};

mod report;
pub use report::{group_thousands, ReportConfig, ThroughputReport};

mod test_producer;
pub use test_producer::TestMessageProducer;
