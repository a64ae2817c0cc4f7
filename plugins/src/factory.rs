use std::sync::Arc;

use anyhow::Result;

use approval_gate_core::api::{AppConfig, ApprovalGate, ApprovalInput, ChatTransport};

use crate::telegram::TelegramTransport;

pub fn build_transport(cfg: &AppConfig) -> Result<Arc<dyn ChatTransport>> {
    Ok(Arc::new(TelegramTransport::new(&cfg.telegram, &cfg.gate)?))
}

pub fn build_gate(cfg: &AppConfig) -> Result<ApprovalGate> {
    let transport = build_transport(cfg)?;
    Ok(ApprovalGate::new(transport, cfg.telegram.clone(), cfg.gate.clone()))
}

/// One-shot entry point for pipelines: loads config from `config.toml` and
/// the environment, asks, and returns whether to proceed. A config that
/// cannot be loaded is treated like an unconfigured channel.
pub async fn request_approval(
    gate: &str,
    summary: &str,
    details: &[String],
    context_id: Option<&str>,
    timeout_secs: Option<u64>,
    skip: bool,
) -> bool {
    if skip {
        return true;
    }

    let cfg = match approval_gate_core::api::load_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(
                target: "approval_gate.gate",
                error = %e,
                "config unusable, auto-approving"
            );
            return true;
        }
    };
    let approval_gate = match build_gate(&cfg) {
        Ok(g) => g,
        Err(e) => {
            tracing::warn!(
                target: "approval_gate.gate",
                error = %e,
                "transport unavailable, auto-approving"
            );
            return true;
        }
    };

    let mut input = ApprovalInput::new(gate, summary).details(details.iter().cloned());
    input.context_id = context_id.map(str::to_string);
    input.timeout_secs = timeout_secs;
    approval_gate.request_approval(input).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skip_short_circuits_before_loading_config() {
        assert!(request_approval("g", "s", &[], None, Some(1), true).await);
    }

    #[test]
    fn gate_reflects_channel_configuration() {
        let mut cfg = AppConfig::default();
        assert!(!build_gate(&cfg).unwrap().is_configured());

        cfg.telegram.bot_token = "t".to_string();
        cfg.telegram.chat_id = "1".to_string();
        assert!(build_gate(&cfg).unwrap().is_configured());
    }
}
