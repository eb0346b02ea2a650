//! Log file setup. The TUI owns the terminal, so all tracing output goes to
//! a daily file under the data directory.

use std::path::Path;

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "songfeed-rs";

/// Our own spans at debug, HTTP at info, everything else at warn
const DEFAULT_FILTER: &str = "songfeed_rs=debug,reqwest=info,warn";

/// `RUST_LOG` when it parses, else [`DEFAULT_FILTER`]
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Start writing logs to `<log_dir>/songfeed-rs.YYYY-MM-DD`.
///
/// Fails if the directory cannot be created or a subscriber is already set.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Flushes on drop; must live as long as the process
    Box::leak(Box::new(guard));

    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(log_filter(env_directives.as_deref()))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .try_init()?;

    tracing::info!(log_dir = %log_dir.display(), version = env!("CARGO_PKG_VERSION"), "Logging initialized");
    Ok(())
}

/// Log the outcome of a feed server call
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(operation = $operation, "Feed server call succeeded"),
            Err(e) => tracing::error!(operation = $operation, error = %e, "Feed server call failed"),
        }
    };
}

/// Log the start of a feed server call with request fields
#[macro_export]
macro_rules! log_api_request {
    ($operation:expr, $($field:tt)*) => {
        tracing::debug!(operation = $operation, $($field)*, "Feed server call started");
    };
}
