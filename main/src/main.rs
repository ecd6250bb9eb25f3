//! 'main' for the channel throughput benchmark
//! Runs a producer into a no-op handler over a direct channel and reports
//! messages per second

use anyhow::Result;
use channel_bench_harness::{Benchmark, BenchmarkConfig, ReportConfig};
use channel_bench_sdk::config::load_config;
use tracing::info;

/// Standard main
pub fn main() -> Result<()> {
    // Initialise tracing - stdout is kept for the results
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    info!("Channel benchmark - direct channel throughput");

    // Read the config
    let config = load_config("channel-bench", "CHANNEL_BENCH")?;
    let benchmark_config = BenchmarkConfig::from_config(&config)?;
    let report_config = ReportConfig::from_config(&config)?;

    // Set up and run it
    let benchmark = Benchmark::new(benchmark_config)?;
    println!("{}", benchmark.banner());

    let report = benchmark.run()?;
    println!("{report}");

    if let Some(output) = &report_config.output {
        report.write_json(output)?;
    }

    // Bye!
    info!("Exiting");
    Ok(())
}
