//! Output helpers shared by CLI commands

use tracing_subscriber::filter::LevelFilter;

/// Format error message for display
pub fn format_error(operation: &str, details: &str) -> String {
    format!("ERROR: {} - {}", operation, details)
}

/// Log level for the `--verbose` / `--quiet` pair.
pub fn level_filter(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::WARN
    } else if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Install the stderr log subscriber.
///
/// Library code logs through the `log` facade; the subscriber's `tracing-log`
/// bridge picks those records up. Calling this twice is harmless.
pub fn init_logging(verbose: bool, quiet: bool) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level_filter(verbose, quiet))
        .try_init();
}
