use approval_gate_core::api::{AppConfig, ApprovalInput, GateReport};
use approval_gate_plugins::build_gate;

use super::cli::RequestArgs;

pub async fn run(cfg: &AppConfig, args: RequestArgs) -> i32 {
    let mut input = ApprovalInput::new(args.gate.as_str(), args.summary.as_str())
        .details(args.details)
        .skip(args.skip);
    input.context_id = args.context_id;
    input.timeout_secs = args.timeout_secs;

    let report = match build_gate(cfg) {
        Ok(gate) => gate.request_detailed(input).await,
        Err(e) => {
            tracing::warn!(
                target: "approval_gate.gate",
                gate = %args.gate,
                error = %e,
                "transport unavailable, auto-approving"
            );
            GateReport::auto_approved(&args.gate)
        }
    };

    print_report(&report, args.json);
    exit_code(&report)
}

fn print_report(report: &GateReport, json: bool) {
    if !json {
        println!("{}: {}", report.gate, report.outcome);
        return;
    }
    match serde_json::to_string(report) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::error!(
            target: "approval_gate.gate",
            error = %e,
            "failed to serialize gate report"
        ),
    }
}

pub fn exit_code(report: &GateReport) -> i32 {
    if report.approved {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use approval_gate_core::api::Outcome;

    use super::*;

    fn args(skip: bool) -> RequestArgs {
        RequestArgs {
            gate: "products".to_string(),
            summary: "Top 5".to_string(),
            details: vec!["#1 A".to_string()],
            context_id: Some("v001".to_string()),
            timeout_secs: Some(1),
            skip,
            json: true,
        }
    }

    #[tokio::test]
    async fn skip_exits_zero_without_credentials() {
        assert_eq!(run(&AppConfig::default(), args(true)).await, 0);
    }

    #[tokio::test]
    async fn unconfigured_channel_exits_zero() {
        assert_eq!(run(&AppConfig::default(), args(false)).await, 0);
    }

    #[test]
    fn rejection_and_timeout_exit_one() {
        let mut report = GateReport::auto_approved("g");
        assert_eq!(exit_code(&report), 0);

        for outcome in [Outcome::Rejected, Outcome::TimedOut] {
            report.outcome = outcome;
            report.approved = outcome.approved();
            assert_eq!(exit_code(&report), 1);
        }
    }
}
