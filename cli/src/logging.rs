use std::path::Path;

use approval_gate_core::api::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber: stderr always, plus `logging.file` when set.
/// Filter precedence is `--log-level`, then `RUST_LOG`, then `logging.level`.
/// The returned guard must live until exit or buffered file lines are lost.
pub fn init(cfg: &LoggingConfig, cli_level: Option<&str>) -> Option<WorkerGuard> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match cfg.file.as_deref().map(Path::new) {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "approval-gate.log".into());
            let (file, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(file))
                .init();
            Some(guard)
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            None
        }
    }
}
