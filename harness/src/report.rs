//! Throughput report - console rendering and optional JSON output
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::recording_registry::ObservationSnapshot;

/// Report configuration, from the [report] section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReportConfig {
    /// Write the report here as JSON, if given
    pub output: Option<PathBuf>,
}

impl ReportConfig {
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.get::<Self>("report") {
            Ok(report) => Ok(report),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e).context("Bad [report] configuration"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ThroughputReport {
    pub label: String,
    pub observation: String,
    pub framework_version: String,
    pub optimized: bool,
    pub warmup_secs: f64,
    pub duration_secs: f64,
    pub started_at: DateTime<Utc>,
    pub iterations: u64,
    pub producer_count: u64,
    pub sink_count: u64,
    pub elapsed_ms: u64,

    /// Whole messages per second, from whole milliseconds
    pub throughput: u64,

    /// Messages per second from the exact elapsed time
    pub throughput_precise: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<BTreeMap<String, ObservationSnapshot>>,
}

impl ThroughputReport {
    /// The headline result line
    pub fn summary(&self) -> String {
        format!(
            "{} Throughput: {} msg/s",
            self.label,
            group_thousands(self.throughput)
        )
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Could not write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for ThroughputReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {}: {} msg/s",
            capitalise(&self.label),
            group_thousands(self.throughput)
        )?;
        writeln!(f)?;
        writeln!(f, "PERFORMANCE RESULTS:")?;
        writeln!(f, "===================")?;
        writeln!(f, "{}", self.summary())?;

        if let Some(observations) = &self.observations {
            for (name, snapshot) in observations {
                writeln!(
                    f,
                    "Observed '{}': {} sends, {} failed, {:.1}ns mean",
                    name,
                    group_thousands(snapshot.count),
                    group_thousands(snapshot.failed),
                    snapshot.mean_ns
                )?;
            }
        }

        if self.optimized {
            writeln!(f, "Using OPTIMIZED build with observability bypass")?;
            write!(f, "NOOP registry detection should eliminate observability overhead")
        } else {
            writeln!(f, "Using STANDARD build")?;
            write!(f, "Build with --features optimized to test the optimized version")
        }
    }
}

/// Format with commas between each group of three digits
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
