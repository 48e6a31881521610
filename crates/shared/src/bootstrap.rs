use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with optional JSON file logging
///
/// The returned guard must live until the process exits, otherwise buffered
/// file logs are lost.
pub fn init_tracing(service_name: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(service_name).into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true));

    if !file_logging_enabled(std::env::var("ENABLE_FILE_LOGGING").ok().as_deref()) {
        registry.init();
        return None;
    }

    // If LOG_DIR is set, use it. Default to "logs"
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name(service_name));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    registry
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .json(),
        )
        .init();

    Some(guard)
}

fn default_filter(service_name: &str) -> String {
    format!("info,{service_name}=debug,cityreport_core=info")
}

fn log_file_name(service_name: &str) -> String {
    format!("cityreport-{service_name}.log")
}

/// File logging is on unless explicitly disabled
fn file_logging_enabled(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.to_lowercase() != "false" && v != "0")
}
