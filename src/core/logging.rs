//! Logging setup
//!
//! Status lines go through `tracing`. `RUST_LOG` overrides the verbosity level.

use tracing_subscriber::{fmt, EnvFilter};

/// Map a verbosity level to a default filter directive
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber.
/// Reads filters from `RUST_LOG`, falling back to the verbosity level.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A subscriber may already be installed (tests, embedding applications)
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("Logging setup complete.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(9), "debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(1);
        init(2);
    }
}
