//! Tracing setup shared by service binaries

use tracing_subscriber::EnvFilter;

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output for local development
    #[default]
    Pretty,
    /// JSON lines for log aggregation
    Json,
}

/// Installs the global tracing subscriber
///
/// The filter comes from `RUST_LOG` when set, otherwise `info`. Calling
/// this more than once is a no-op, so tests can call it freely.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init()
                .ok();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{init_tracing, LogFormat};

    #[test]
    fn repeated_initialization_is_harmless() {
        init_tracing(LogFormat::Pretty);
        init_tracing(LogFormat::Json);
        tracing::info!("subscriber is installed");
    }
}
