use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Ask a human in a Telegram chat before a pipeline continues")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file. Environment variables override its values.
    #[arg(long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Log filter, e.g. `debug` or `approval_gate.poll=trace`. Overrides
    /// `logging.level` and `RUST_LOG`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Send an approval request and block until someone answers.
    /// Exits 0 when approved (or auto-approved), 1 otherwise.
    Request(RequestArgs),
    /// Report whether the approval channel is configured. No network calls.
    Check(CheckArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RequestArgs {
    /// Short label naming the pipeline stage.
    #[arg(long)]
    pub gate: String,

    #[arg(long)]
    pub summary: String,

    /// Extra line under the summary. Can be specified multiple times.
    #[arg(long = "detail", action = clap::ArgAction::Append)]
    pub details: Vec<String>,

    /// Identifier of the item under review, shown as `Video: <id>`.
    #[arg(long)]
    pub context_id: Option<String>,

    /// Overrides `gate.default_timeout_secs`.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Approve immediately without contacting anyone.
    #[arg(long, default_value_t = false)]
    pub skip: bool,

    /// Print the decision as JSON on stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_collects_repeated_details() {
        let args = Args::try_parse_from([
            "approval-gate",
            "request",
            "--gate",
            "products",
            "--summary",
            "Top 5",
            "--detail",
            "#1 A",
            "--detail",
            "#2 B",
            "--timeout-secs",
            "60",
        ])
        .unwrap();

        let Commands::Request(req) = args.command else {
            panic!("expected request");
        };
        assert_eq!(req.details, vec!["#1 A", "#2 B"]);
        assert_eq!(req.timeout_secs, Some(60));
        assert!(!req.skip);
        assert_eq!(args.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn request_requires_gate_and_summary() {
        assert!(Args::try_parse_from(["approval-gate", "request", "--gate", "g"]).is_err());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let args =
            Args::try_parse_from(["approval-gate", "check", "--config", "/etc/gate.toml"]).unwrap();
        assert!(matches!(args.command, Commands::Check(_)));
        assert_eq!(args.config, PathBuf::from("/etc/gate.toml"));
    }
}
