//! Subscriber bootstrap for hosts embedding the engine.
//!
//! The engine only emits `tracing` events; installing a subscriber is the
//! host's call. [`init_tracing`] is the stock setup: engine events at the
//! requested level, everything else at `warn`, and an optional daily log file
//! in a directory the host picks.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILE_PREFIX: &str = "mastery-engine.log";

/// Keeps the background file writer alive. Dropping it flushes pending lines.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    /// Level for `mastery_engine` targets.
    pub engine_level: String,
    /// Extra `EnvFilter` directives appended after the engine directive.
    pub extra_directives: Option<String>,
    /// Daily-rolling log file directory. `None` logs to stdout only.
    pub file_dir: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            engine_level: "info".to_string(),
            extra_directives: None,
            file_dir: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl LogSettings {
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            engine_level: level.into(),
            ..Self::default()
        }
    }

    pub fn with_file_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file_dir = Some(dir.into());
        self
    }

    /// Reads `MASTERY_LOG_LEVEL`, `MASTERY_LOG_FILTER` and `MASTERY_LOG_DIR`
    /// on top of the defaults. Empty values are ignored.
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();
        if let Some(level) = read("MASTERY_LOG_LEVEL") {
            settings.engine_level = level;
        }
        settings.extra_directives = read("MASTERY_LOG_FILTER");
        settings.file_dir = read("MASTERY_LOG_DIR").map(PathBuf::from);
        settings
    }

    /// Filter directives: `warn` for other crates, the engine level for
    /// `mastery_engine`, then any extra directives.
    pub fn directives(&self) -> String {
        let mut directives = format!("warn,mastery_engine={}", self.engine_level.trim());
        if let Some(extra) = &self.extra_directives {
            directives.push(',');
            directives.push_str(extra.trim());
        }
        directives
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.directives())
            .unwrap_or_else(|_| EnvFilter::new(LogSettings::default().directives()))
    }
}

/// Installs the global subscriber.
///
/// Returns the file guard when a file layer was installed. A second call
/// leaves the first subscriber in place and returns `None`.
pub fn init_tracing(settings: &LogSettings) -> Option<FileLogGuard> {
    let env_filter = settings.env_filter();
    let stdout_layer = fmt::layer().with_target(true);

    if let Some(dir) = &settings.file_dir {
        match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender =
                    RollingFileAppender::new(Rotation::DAILY, dir, &settings.file_prefix);
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(true);

                let installed = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .try_init()
                    .is_ok();

                return installed.then_some(FileLogGuard { _guard: guard });
            }
            Err(err) => {
                let installed = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .try_init()
                    .is_ok();
                if installed {
                    tracing::warn!(dir = %dir.display(), error = %err, "log directory unavailable, logging to stdout only");
                }
                return None;
            }
        }
    }

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_scopes_engine_target() {
        let settings = LogSettings::default();
        assert_eq!(settings.directives(), "warn,mastery_engine=info");
        assert!(settings.file_dir.is_none());
        assert_eq!(settings.file_prefix, DEFAULT_FILE_PREFIX);
    }

    #[test]
    fn extra_directives_follow_engine_level() {
        let settings = LogSettings {
            extra_directives: Some("my_host=debug".into()),
            ..LogSettings::with_level("trace")
        };
        assert_eq!(settings.directives(), "warn,mastery_engine=trace,my_host=debug");
    }

    #[test]
    fn caller_supplies_file_dir() {
        let settings = LogSettings::with_level("debug").with_file_dir("/var/log/tutor");
        assert_eq!(settings.file_dir, Some(PathBuf::from("/var/log/tutor")));
    }

    #[test]
    fn invalid_level_falls_back_to_default_filter() {
        let settings = LogSettings::with_level("not a level!!");
        // Building the filter must not panic.
        let _ = settings.env_filter();
    }

    #[test]
    fn from_env_reads_dir_and_level() {
        std::env::set_var("MASTERY_LOG_LEVEL", "debug");
        std::env::set_var("MASTERY_LOG_DIR", "/tmp/mastery-logs");
        std::env::set_var("MASTERY_LOG_FILTER", "  ");
        let settings = LogSettings::from_env();
        std::env::remove_var("MASTERY_LOG_LEVEL");
        std::env::remove_var("MASTERY_LOG_DIR");
        std::env::remove_var("MASTERY_LOG_FILTER");

        assert_eq!(settings.engine_level, "debug");
        assert_eq!(settings.file_dir, Some(PathBuf::from("/tmp/mastery-logs")));
        assert_eq!(settings.extra_directives, None);
    }
}
