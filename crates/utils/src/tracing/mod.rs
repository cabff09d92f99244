use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing system
///
/// Diagnostics always go to standard error so they never mix with the
/// replayed or captured standard output. Without `-v` only errors are
/// shown; with it, debug events describing the cache decision are shown
/// too. `RUST_LOG` overrides both.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "error"
    }
}

/// Check if standard error is attached to a terminal
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Emit a structured event for a cache lookup
pub fn cache_event(key: &str, hit: bool, path: &Path) {
    if hit {
        ::tracing::debug!(key = %key, path = %path.display(), "cache_hit");
    } else {
        ::tracing::debug!(key = %key, path = %path.display(), "cache_miss");
    }
}
