//! Logging for the `ttcn` binary. Events go to stderr so that reports on
//! stdout stay machine readable.
//!
//! Nothing is installed unless `-v` is given or `TTCN_LOG` (then `RUST_LOG`)
//! holds a filter. A filter from the environment wins over `-v`:
//!
//! ```bash
//! ttcn -vv --log-format tree src/
//! TTCN_LOG="ttcn_program=trace" ttcn src/
//! ```

use crate::args::{CliArgs, LogFormat};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directives. `None` leaves logging off.
    pub filter: Option<String>,
    pub format: LogFormat,
}

impl LogSettings {
    pub fn new(verbose: u8, format: LogFormat, env_filter: Option<String>) -> LogSettings {
        let filter = env_filter
            .filter(|directives| !directives.trim().is_empty())
            .or_else(|| match verbose {
                0 => None,
                1 => Some("debug".to_string()),
                _ => Some("trace".to_string()),
            });
        LogSettings { filter, format }
    }

    pub fn from_args(args: &CliArgs) -> LogSettings {
        let env_filter = std::env::var("TTCN_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        LogSettings::new(args.verbose, args.log_format, env_filter)
    }

    /// Install the global subscriber.
    pub fn install(&self) -> Result<(), TryInitError> {
        let Some(directives) = &self.filter else {
            return Ok(());
        };
        let registry = Registry::default().with(EnvFilter::builder().parse_lossy(directives));
        match self.format {
            LogFormat::Text => registry
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init(),
            LogFormat::Tree => registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_targets(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
        }
    }
}
