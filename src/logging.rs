use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Colour only when stderr is a terminal and `NO_COLOR` is unset or empty.
fn ansi_enabled(stderr_is_terminal: bool, no_color: Option<&str>) -> bool {
    stderr_is_terminal && no_color.map_or(true, str::is_empty)
}

/// Progress goes to stderr so stdout only carries the final summary.
/// `RUST_LOG` wins over `-v` when set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi_enabled(
                    std::io::stderr().is_terminal(),
                    std::env::var("NO_COLOR").ok().as_deref(),
                ))
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init();
}
