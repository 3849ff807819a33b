//! Log output for layout and replay
//!
//! envdraw reports through `tracing`; this module installs the subscriber
//! that writes those reports to stderr, so text and JSON renders on stdout
//! stay clean.
//!
//! ```rust,no_run
//! use envdraw::core::logging::init_logging;
//!
//! init_logging(Some("debug"), Some("pretty")).unwrap();
//! ```
//!
//! # What gets logged
//!
//! | target | level | content |
//! |--------|-------|---------|
//! | `envdraw::trace::tracker` | info | `replay` span (`steps`), one summary per replay |
//! | `envdraw::trace::tracker` | warn | argument count mismatches, the step that failed |
//! | `envdraw::layout::router` | trace | `route` span (`start`, `goal`), completed route cost and length |
//! | `envdraw::layout::router` | debug | truncated searches and goals off the start lattice |
//! | `envdraw::layout::placer` | debug | sample counts and overlap-free flag |
//! | `envdraw::layout::anchor` | trace | every anchor choice |
//! | `envdraw::diagram::session` | debug/trace | node placement, rebinding, connector creation |
//! | `envdraw::diagram::session` | warn | connectors drawn as a direct stub after a routing failure |
//!
//! The pretty and json formats print span enter/exit, so a slow `route`
//! span shows up with its endpoints attached.
//!
//! # Configuration
//!
//! The explicit arguments win, then `ENVDRAW_LOG_LEVEL` or `RUST_LOG` for the
//! level and `ENVDRAW_LOG_FORMAT` for the format. Without any of them the
//! level is `info` and the format `compact`. Directives work as usual:
//!
//! ```bash
//! RUST_LOG="warn,envdraw::layout::router=trace" envdraw render -i trace.env
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// # Arguments
///
/// * `level` - Optional log level string (trace|debug|info|warn|error|off).
///            If None, uses `ENVDRAW_LOG_LEVEL` or `RUST_LOG`, or defaults to `info`.
/// * `format` - Optional log format (compact|pretty|json).
///             If None, uses `ENVDRAW_LOG_FORMAT`, or defaults to `compact`.
///
/// # Returns
///
/// Returns an error if the format is unknown or a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let directives = level
        .map(str::to_string)
        .or_else(|| std::env::var("ENVDRAW_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok());
    let filter = directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let log_format = format
        .map(str::to_string)
        .or_else(|| std::env::var("ENVDRAW_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());

    let format = LogFormat::from_str(&log_format)
        .map_err(|e| format!("Invalid log format: {}", e))?;

    let detailed = format != LogFormat::Compact;
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(detailed)
        .with_file(detailed)
        .with_line_number(detailed)
        .with_span_events(if detailed { FmtSpan::ACTIVE } else { FmtSpan::NONE });
    let registry = Registry::default().with(filter);
    match format {
        LogFormat::Compact => registry.with(layer.compact()).try_init()?,
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
        LogFormat::Json => registry.with(layer.json()).try_init()?,
    }

    Ok(())
}

/// Initialize logging with default settings (info level, compact format)
///
/// This is a convenience function that calls `init_logging(None, None)`.
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(
            LogFormat::from_str("COMPACT").unwrap(),
            LogFormat::Compact
        );
        assert!(LogFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_format_variants() {
        let variants = LogFormat::variants();
        assert!(variants.contains(&"compact"));
        assert!(variants.contains(&"pretty"));
        assert!(variants.contains(&"json"));
    }
}
