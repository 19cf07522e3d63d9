use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise logging. The default level is `info`; with `debug` enabled it
/// is `debug` and can be overridden via the `RUST_LOG` environment variable.
/// When `log_file` is given, output is also appended to that file.
///
/// Calling this more than once is harmless; only the first call installs a
/// subscriber.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // Without debug logging the level is forced to `info` so a stray
    // `RUST_LOG` in the environment cannot make the dashboard chatty.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer());

    let result = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("dashboard.log"));
            let appender = tracing_appender::rolling::never(dir, file_name);
            registry
                .with(fmt::layer().with_writer(appender).with_ansi(false))
                .try_init()
        }
        None => registry.try_init(),
    };

    if result.is_err() {
        tracing::debug!("logging already initialised");
    }
}
