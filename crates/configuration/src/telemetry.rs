use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

/// Installs the global tracing subscriber.
///
/// Log lines go to stdout through a non-blocking writer. The level defaults to
/// `info` and can be overridden with `RUST_LOG`. The returned guard flushes
/// pending lines when dropped, so the caller must keep it alive until exit.
pub fn init_tracing() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::rfc_3339())
        .with_target(false)
        .with_writer(writer)
        .init();

    guard
}
