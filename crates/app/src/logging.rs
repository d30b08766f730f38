//! Log subscriber setup.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Level used when `RUST_LOG` is unset, raised by each `-v`.
const fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays free for
/// exported documents.
pub fn init(verbose: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbose).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_raises_level() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(5), LevelFilter::DEBUG);
    }
}
