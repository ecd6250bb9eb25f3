//! Layered configuration loading
use anyhow::{Context, Result};
use config::{Config, Environment, File};

/// Load the standard layered config: an optional file `<file_stem>.toml`
/// (or any other format `config` recognises), then environment variables
/// with the given prefix, using `__` to separate nested keys - for example
/// `<PREFIX>_BENCHMARK__DURATION_SECS`.
pub fn load_config(file_stem: &str, env_prefix: &str) -> Result<Config> {
    Config::builder()
        .add_source(File::with_name(file_stem).required(false))
        .add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to load configuration from '{file_stem}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn config_from_toml(toml: &str) -> Config {
        Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
    }

    #[test]
    fn test_file_values_are_read() {
        let config = config_from_toml(
            r#"
            [benchmark]
            label = "Direct channel"
            duration_secs = 0.5
            "#,
        );

        assert_eq!(config.get_string("benchmark.label").unwrap(), "Direct channel");
        assert_eq!(config.get_float("benchmark.duration_secs").unwrap(), 0.5);
    }

    #[test]
    fn test_environment_nests_on_double_underscore() {
        std::env::set_var("CHANNEL_BENCH_SDK_NEST_BENCHMARK__DURATION_SECS", "0.5");
        std::env::set_var("CHANNEL_BENCH_SDK_NEST_BENCHMARK__OBSERVATION", "recording");

        let config = load_config("no-such-config-file", "CHANNEL_BENCH_SDK_NEST").unwrap();

        assert_eq!(config.get_float("benchmark.duration_secs").unwrap(), 0.5);
        assert_eq!(config.get_string("benchmark.observation").unwrap(), "recording");
    }

    #[test]
    fn test_load_config_without_file_is_empty() {
        let config = load_config("no-such-config-file", "CHANNEL_BENCH_SDK_TEST").unwrap();
        assert!(config.get_string("benchmark.label").is_err());
    }
}
