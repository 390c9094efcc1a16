use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Logs go to a daily rolling file under `log_dir` so stdout stays clean for
/// command output. `verbose` mirrors them to stderr. `RUST_LOG` overrides
/// `default_filter`. Keep the returned guard alive until exit or buffered
/// lines are lost.
pub fn init(default_filter: &str, log_dir: &Path, verbose: bool) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("animehub")
        .filename_suffix("log")
        .build(log_dir);

    let (file_layer, guard) = match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        Err(e) => {
            eprintln!("warning: file logging disabled: {e}");
            (None, None)
        }
    };

    let stderr_layer = verbose.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}
