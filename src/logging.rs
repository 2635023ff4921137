//! Logging setup.
//!
//! Events go to stderr so they never mix with table output. The level
//! comes from `PENSIONDESK_LOG` and defaults to `warn`; the TUI runs with
//! logging `off` since stderr shares its screen.

use tracing::level_filters::LevelFilter;

pub fn init_logger() {
    let level = std::env::var("PENSIONDESK_LOG").unwrap_or_else(|_| "warn".to_string());
    init_logger_with_level(&level);
}

pub fn init_logger_with_level(level: &str) {
    let level = level.parse().unwrap_or(LevelFilter::WARN);
    // a second init (e.g. from tests) is ignored
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init();
}
