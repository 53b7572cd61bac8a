//! Diagnostic logging setup for the binary

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count.
fn directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "treescribe=warn",
        1 => "treescribe=info",
        2 => "treescribe=debug",
        _ => "treescribe=trace",
    }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `verbosity`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbosity: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
