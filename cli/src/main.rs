use clap::Parser;

mod commands;
mod logging;

use approval_gate_core::api::load_from;
use commands::cli;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    // Logging is configured from the file, so a broken config is reported
    // only once the subscriber is up.
    let loaded = load_from(&args.config, |key| std::env::var(key).ok());
    let cfg = loaded.as_ref().cloned().unwrap_or_default();
    let log_guard = logging::init(&cfg.logging, args.log_level.as_deref());

    if let Err(e) = &loaded {
        tracing::warn!(
            target: "approval_gate.gate",
            config = %args.config.display(),
            error = %e,
            "config unusable, continuing unconfigured"
        );
    }

    let exit = match args.command {
        cli::Commands::Request(req) => commands::request::run(&cfg, req).await,
        cli::Commands::Check(check) => commands::check::run(&cfg, check),
    };

    drop(log_guard);
    std::process::exit(exit);
}
