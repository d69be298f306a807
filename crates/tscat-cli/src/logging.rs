//! Subscriber setup for the `tscat` binary.
//!
//! `TSCAT_LOG` takes an `EnvFilter` directive (`tscat.reconcile=debug`,
//! `info`, ...) and wins over `-v`. Without it the level is `warn`, `info`
//! with `-v` and `debug` with `-vv` or more. Logs go to stderr so command
//! output on stdout stays pipeable.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "TSCAT_LOG";

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(verbosity: u8, json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(9), "debug");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(0, false);
        init(2, true);
    }
}
