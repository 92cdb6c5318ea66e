//! Tracing setup: stdout for interactive runs plus a daily-rolling file
//! under the app's log directory.

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::paths::AppPaths;

const LOG_FILE_PREFIX: &str = "primis-backend.log";

/// Default when `RUST_LOG` is unset: app at info, sqlx statement logging
/// and hyper connection churn quieted.
const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn";

// Dropping the guard flushes and stops the writer thread, so it lives for
// the whole process.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init(paths: &AppPaths) {
    if LOG_GUARD.get().is_some() {
        return;
    }

    let _ = std::fs::create_dir_all(&paths.log_dir);

    let file_appender = tracing_appender::rolling::daily(&paths.log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init();

    tracing::info!("Logging to {}", paths.log_dir.display());
}
