//! Structured logging for Orbis.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. `log` records from the render and config crates are
//! bridged into the same subscriber.

use std::fs::File;
use std::path::Path;

use orbis_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directives applied when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log written under the log directory.
pub const LOG_FILE_NAME: &str = "orbis.log";

/// Filter directives for a configured level.
///
/// A bare level such as `"debug"` keeps GPU backend chatter at `warn`; a full
/// directive list is used as given.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        DEFAULT_FILTER.to_string()
    } else if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{level},wgpu=warn,naga=warn")
    }
}

/// Create the log directory and truncate the JSON log file.
pub fn open_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE_NAME)).ok()
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. The JSON file layer is only
/// attached when `debug_build` is set and `log_dir` is writable.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = config
        .map(|config| filter_directives(&config.debug.log_level))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && let Some(log_file) = open_log_file(log_dir)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter_str = format!("{}", default_env_filter());
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_bare_level_keeps_gpu_quiet() {
        assert_eq!(filter_directives("debug"), "debug,wgpu=warn,naga=warn");
        assert_eq!(filter_directives(""), DEFAULT_FILTER);
    }

    #[test]
    fn test_directive_list_passes_through() {
        assert_eq!(
            filter_directives("warn,orbis_landmass=trace"),
            "warn,orbis_landmass=trace"
        );
        assert!(EnvFilter::try_new(filter_directives("warn,orbis_globe=debug")).is_ok());
    }

    #[test]
    fn test_config_level_is_used() {
        let mut config = Config::default();
        config.debug.log_level = "trace".into();
        let filter = EnvFilter::new(filter_directives(&config.debug.log_level));
        assert!(format!("{filter}").contains("trace"));
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");
        assert!(open_log_file(&log_dir).is_some());
        assert!(log_dir.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_json_layer_writes_structured_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = open_log_file(temp_dir.path()).unwrap();

        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(fmt::layer().with_writer(file).with_ansi(false).json());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(points = 42, "land particles built");
        });

        let contents = std::fs::read_to_string(temp_dir.path().join(LOG_FILE_NAME)).unwrap();
        let line = contents.lines().next().unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["fields"]["message"], "land particles built");
        assert_eq!(value["fields"]["points"], 42);
    }
}
