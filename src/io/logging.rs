//! Structured logging setup for the command-line front end

use tracing_subscriber::EnvFilter;

/// How much the binary reports on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet,
    /// Stage-by-stage status messages
    Normal,
    /// Everything including parsed replies and request sizes
    Verbose,
}

impl Verbosity {
    /// Filter directive used when `RUST_LOG` is not set
    pub const fn default_directive(self) -> &'static str {
        match self {
            Self::Quiet => "collagist=warn",
            Self::Normal => "collagist=info",
            Self::Verbose => "collagist=debug",
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the verbosity
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(verbosity: Verbosity) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
