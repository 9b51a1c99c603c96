//! Logging setup for the snapvault binary
//!
//! Diagnostics go to stderr so stdout stays reserved for command output.
//! The filter honours `RUST_LOG` and otherwise stays at warnings only;
//! `SNAPVAULT_LOG_FORMAT=json` switches to structured output for log
//! shippers.

use tracing_subscriber::EnvFilter;

/// Output format for diagnostic events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Pick the format from `SNAPVAULT_LOG_FORMAT`
    pub fn from_env() -> Self {
        Self::parse(std::env::var("SNAPVAULT_LOG_FORMAT").ok().as_deref())
    }

    /// Anything other than an explicit `json` request means text
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Install the tracing subscriber for this process
///
/// Safe to call more than once: when a subscriber is already installed
/// (tests, embedding callers), the call is a no-op.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("snapvault=warn"));

    let _ = match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_text() {
        assert_eq!(LogFormat::parse(None), LogFormat::Text);
    }

    #[test]
    fn test_format_json_requested_any_case() {
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("JSON")), LogFormat::Json);
    }

    #[test]
    fn test_format_unrecognized_value_falls_back_to_text() {
        assert_eq!(LogFormat::parse(Some("yaml")), LogFormat::Text);
        assert_eq!(LogFormat::parse(Some("")), LogFormat::Text);
    }

    #[test]
    fn test_repeated_init_is_a_no_op() {
        init(LogFormat::Text);
        init(LogFormat::Json);
        init(LogFormat::Text);
    }
}
