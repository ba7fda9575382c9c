//! tracing subscriber setup
//!
//! Logs go to a rolling file (text or JSON). Text mode also mirrors to
//! stdout for interactive use. `RUST_LOG` overrides the configured level.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;

/// Dependencies that are chatty at `info`
const QUIET_TARGETS: &[&str] = &["sqlx", "hyper", "reqwest"];

fn rotation(name: &str) -> Rotation {
    match name {
        "minutely" => Rotation::MINUTELY,
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        _ => Rotation::NEVER,
    }
}

fn filter_directives(level: &str) -> String {
    let mut directives = vec![level.to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|t| format!("{}=warn", t)));
    directives.join(",")
}

/// Install the global subscriber. The returned guard must outlive all
/// logging or buffered file output is lost.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender =
        RollingFileAppender::new(rotation(&config.rotation), &config.log_dir, &config.log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_current_span(false)
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().compact().with_target(false);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_quiet_dependencies() {
        let d = filter_directives("debug");
        assert!(d.starts_with("debug,"));
        assert!(d.contains("sqlx=warn"));
        assert!(d.contains("reqwest=warn"));
        assert!(EnvFilter::try_new(&d).is_ok());
    }

    #[test]
    fn test_unknown_rotation_never_rolls() {
        assert_eq!(rotation("hourly"), Rotation::HOURLY);
        assert_eq!(rotation("weekly"), Rotation::NEVER);
    }
}
