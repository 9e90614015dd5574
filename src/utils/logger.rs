use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Directive used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "openhack_client=debug,openhack=debug,info"
    } else {
        "openhack_client=warn,openhack=warn"
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(LogFormat::Compact, default_directive(verbose));
}

pub fn init_json_logger() {
    init_logger(LogFormat::Json, "openhack_client=info,openhack=info");
}

/// Installs the global subscriber. Command output goes to stdout, so every log line is
/// written to stderr. A second call keeps the first subscriber.
pub fn init_logger(format: LogFormat, directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Compact => registry.with(layer.with_target(false).compact()).try_init(),
        LogFormat::Json => registry.with(layer.with_target(true).json()).try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("logger already initialised: {}", e);
    }
}
