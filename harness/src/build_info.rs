//! Framework version and build flavour, for the report banner
use serde::Serialize;

/// Version label used when nothing better is available
pub const UNKNOWN_VERSION: &str = "unknown";

/// Versions containing this marker are optimized snapshot builds
pub const OPTIMIZED_MARKER: &str = "TEST-SNAPSHOT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub optimized: bool,
}

impl BuildInfo {
    /// Work out the framework version - configured value first, then one
    /// baked in at build time via CHANNEL_BENCH_FRAMEWORK_VERSION, then the
    /// SDK's own package version
    pub fn detect(configured: Option<&str>) -> Self {
        Self::resolve(
            &[
                configured,
                option_env!("CHANNEL_BENCH_FRAMEWORK_VERSION"),
                Some(channel_bench_sdk::VERSION),
            ],
            cfg!(feature = "optimized"),
        )
    }

    /// First non-empty candidate wins, "unknown" if there are none
    fn resolve(candidates: &[Option<&str>], optimized_build: bool) -> Self {
        let version = candidates
            .iter()
            .flatten()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_VERSION)
            .to_string();

        let optimized = optimized_build || version.contains(OPTIMIZED_MARKER);
        Self { version, optimized }
    }
}
