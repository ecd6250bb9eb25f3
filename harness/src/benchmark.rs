//! Benchmark driver - setup, warmup and measurement phases
use anyhow::{anyhow, Context, Result};
use arcstr::ArcStr;
use channel_bench_sdk::{DirectChannel, Lifecycle, NoopObservationRegistry};
use chrono::Utc;
use config::{Config, ConfigError};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::build_info::BuildInfo;
use crate::noop_handler::NoOpMessageHandler;
use crate::recording_registry::RecordingRegistry;
use crate::report::ThroughputReport;
use crate::test_producer::TestMessageProducer;

const DEFAULT_WARMUP_SECS: f64 = 60.0;
const DEFAULT_DURATION_SECS: f64 = 600.0;
const DEFAULT_PAYLOAD: &str = "performance-test-message";
const DEFAULT_LABEL: &str = "Direct channel";
const OUTPUT_CHANNEL: &str = "output";

/// Which observation registry the producer reports to
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationMode {
    #[default]
    Noop,
    Recording,
}

impl fmt::Display for ObservationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationMode::Noop => write!(f, "NOOP"),
            ObservationMode::Recording => write!(f, "RECORDING"),
        }
    }
}

/// Benchmark configuration, from the [benchmark] section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub warmup_secs: f64,
    pub duration_secs: f64,
    pub payload: String,
    pub label: String,
    pub observation: ObservationMode,
    pub framework_version: Option<String>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            warmup_secs: DEFAULT_WARMUP_SECS,
            duration_secs: DEFAULT_DURATION_SECS,
            payload: DEFAULT_PAYLOAD.to_string(),
            label: DEFAULT_LABEL.to_string(),
            observation: ObservationMode::default(),
            framework_version: None,
        }
    }
}

impl BenchmarkConfig {
    /// Read from the [benchmark] section, all defaults if it is missing
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.get::<Self>("benchmark") {
            Ok(benchmark) => Ok(benchmark),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e).context("Bad [benchmark] configuration"),
        }
    }

    pub fn warmup(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.warmup_secs)
            .map_err(|e| anyhow!("Bad warmup_secs {}: {e}", self.warmup_secs))
    }

    pub fn duration(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.duration_secs)
            .map_err(|e| anyhow!("Bad duration_secs {}: {e}", self.duration_secs))
    }
}

/// Result of the timed phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub iterations: u64,
    pub elapsed: Duration,
}

impl Measurement {
    pub fn throughput(&self) -> u64 {
        throughput(self.iterations, self.elapsed)
    }
}

/// Messages per second, truncated to whole milliseconds and integer division
/// Elapsed below one millisecond counts as one millisecond
pub fn throughput(iterations: u64, elapsed: Duration) -> u64 {
    let millis = elapsed.as_millis().max(1);
    let rate = u128::from(iterations) * 1000 / millis;
    u64::try_from(rate).unwrap_or(u64::MAX)
}

/// Benchmark - a producer wired straight to a no-op handler
pub struct Benchmark {
    config: BenchmarkConfig,
    warmup: Duration,
    duration: Duration,
    payload: ArcStr,
    producer: TestMessageProducer,
    handler: Arc<NoOpMessageHandler>,
    recorder: Option<Arc<RecordingRegistry>>,
    build_info: BuildInfo,
}

impl Benchmark {
    /// Setup phase - build and wire everything, and start the producer
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        let warmup = config.warmup()?;
        let duration = config.duration()?;
        let build_info = BuildInfo::detect(config.framework_version.as_deref());

        info!("Creating benchmark '{}'", config.label);
        info!(" - {:?} warmup then {:?} measurement", warmup, duration);
        info!(" - {} observation registry", config.observation);

        let handler = Arc::new(NoOpMessageHandler::new());
        let mut channel = DirectChannel::new(OUTPUT_CHANNEL);
        channel.subscribe(handler.clone())?;

        let mut producer = TestMessageProducer::new();
        producer.set_output_channel(Arc::new(channel));

        let recorder = match config.observation {
            ObservationMode::Noop => {
                producer.register_observation_registry(NoopObservationRegistry::shared());
                None
            }
            ObservationMode::Recording => {
                let recorder = Arc::new(RecordingRegistry::new());
                producer.register_observation_registry(recorder.clone());
                Some(recorder)
            }
        };

        producer.start()?;

        Ok(Self {
            payload: ArcStr::from(config.payload.as_str()),
            config,
            warmup,
            duration,
            producer,
            handler,
            recorder,
            build_info,
        })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn build_info(&self) -> &BuildInfo {
        &self.build_info
    }

    pub fn producer(&self) -> &TestMessageProducer {
        &self.producer
    }

    pub fn handler(&self) -> &NoOpMessageHandler {
        &self.handler
    }

    pub fn recorder(&self) -> Option<&RecordingRegistry> {
        self.recorder.as_deref()
    }

    /// Console banner printed before the run
    pub fn banner(&self) -> String {
        let lines = vec![
            "=== Channel Pipeline Performance Analysis ===".to_string(),
            format!(
                "Testing direct channel with {} observability registry",
                self.config.observation
            ),
            format!("Framework Version: {}", self.build_info.version),
            format!(
                "Using Optimized Build: {}",
                if self.build_info.optimized { "YES" } else { "NO" }
            ),
            format!("Test Duration: {:?} after {:?} warmup", self.duration, self.warmup),
            String::new(),
            format!("Measuring {}...", self.config.label),
        ];
        lines.join("\n")
    }

    /// Warmup phase - send for the warmup period, then discard all counts
    /// Returns the number of messages sent during warmup
    pub fn warmup(&self) -> Result<u64> {
        info!("Warming up for {:?}", self.warmup);

        let start = Instant::now();
        let mut sent = 0u64;
        while start.elapsed() < self.warmup {
            self.producer.send(&self.payload)?;
            sent += 1;
        }

        self.reset();
        debug!("Warmup sent {sent} messages");
        Ok(sent)
    }

    /// Measurement phase - send for the measurement period, counting
    /// Keeps going until at least one whole millisecond has elapsed, even
    /// with a zero duration
    pub fn measure(&self) -> Result<Measurement> {
        info!("Measuring for {:?}", self.duration);

        let start = Instant::now();
        let mut iterations = 0u64;
        let elapsed = loop {
            let elapsed = start.elapsed();
            if elapsed >= self.duration && elapsed.as_millis() > 0 {
                break elapsed;
            }
            self.producer.send(&self.payload)?;
            iterations += 1;
        };

        let measurement = Measurement { iterations, elapsed };
        info!(
            "Measured {} messages in {:.3}s",
            iterations,
            elapsed.as_secs_f64()
        );
        Ok(measurement)
    }

    /// Zero the producer and handler counts, and any recorded observations
    pub fn reset(&self) {
        self.producer.reset();
        self.handler.reset();
        if let Some(recorder) = &self.recorder {
            recorder.reset();
        }
    }

    /// Run warmup then measurement and build the report
    pub fn run(&self) -> Result<ThroughputReport> {
        self.warmup()?;

        let started_at = Utc::now();
        let measurement = self.measure()?;

        Ok(ThroughputReport {
            label: self.config.label.clone(),
            observation: self.config.observation.to_string(),
            framework_version: self.build_info.version.clone(),
            optimized: self.build_info.optimized,
            warmup_secs: self.warmup.as_secs_f64(),
            duration_secs: self.duration.as_secs_f64(),
            started_at,
            iterations: measurement.iterations,
            producer_count: self.producer.count(),
            sink_count: self.handler.count(),
            elapsed_ms: u64::try_from(measurement.elapsed.as_millis()).unwrap_or(u64::MAX),
            throughput: measurement.throughput(),
            throughput_precise: measurement.iterations as f64
                / measurement.elapsed.as_secs_f64(),
            observations: self.recorder.as_ref().map(|r| r.snapshot()),
        })
    }
}

impl Drop for Benchmark {
    fn drop(&mut self) {
        self.producer.stop();
    }
}
