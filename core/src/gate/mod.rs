//! Blocking human approval over a chat bot.
//!
//! One call runs `suspend webhook -> flush cursor -> send -> poll -> finalize
//! -> restore webhook`, strictly in that order. Whenever nobody can be asked
//! the gate auto-approves, so a broken channel never stalls the pipeline.

mod backoff;
mod cursor;
mod dispatch;
mod finalize;
mod outcome;
mod poller;
mod request;
pub mod token;
mod webhook;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::{GateConfig, TelegramConfig};
use crate::transport::ChatTransport;

/// Deadline used when the requested timeout does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

pub use backoff::Backoff;
pub use cursor::UpdateCursor;
pub use dispatch::{approval_message, dispatch, APPROVE_LABEL, REJECT_LABEL};
pub use finalize::{finalize, finalized_text};
pub use outcome::Outcome;
pub use poller::{classify, Classification, ExpectedResponse, PollState, ResponsePoller};
pub use request::{ApprovalInput, ApprovalRequest};
pub use token::{Action, ActionToken};
pub use webhook::{restore, suspend, with_webhook_suspended};

#[derive(Debug, Clone, Serialize)]
pub struct GateReport {
    pub gate: String,
    /// Absent when the gate resolved before a request was minted.
    pub correlation_id: Option<String>,
    pub message_id: Option<i64>,
    pub outcome: Outcome,
    pub approved: bool,
    pub decided_at: DateTime<Utc>,
}

impl GateReport {
    fn new(
        gate: &str,
        correlation_id: Option<&str>,
        message_id: Option<i64>,
        outcome: Outcome,
    ) -> Self {
        Self {
            gate: gate.to_string(),
            correlation_id: correlation_id.map(str::to_string),
            message_id,
            outcome,
            approved: outcome.approved(),
            decided_at: Utc::now(),
        }
    }

    /// Decision for a gate that never reached the chat.
    pub fn auto_approved(gate: &str) -> Self {
        Self::new(gate, None, None, Outcome::AutoApproved)
    }
}

/// Approval gate bound to one bot identity.
///
/// Calls through the same instance are served one at a time: the webhook
/// registration and the update stream belong to the bot, not to a request.
pub struct ApprovalGate {
    transport: Arc<dyn ChatTransport>,
    channel: TelegramConfig,
    settings: GateConfig,
    in_flight: Mutex<()>,
}

impl ApprovalGate {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        channel: TelegramConfig,
        settings: GateConfig,
    ) -> Self {
        Self {
            transport,
            channel,
            settings,
            in_flight: Mutex::new(()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.channel.is_configured()
    }

    /// `true` when approved or auto-approved, `false` on rejection or timeout.
    pub async fn request_approval(&self, input: ApprovalInput) -> bool {
        self.request_detailed(input).await.approved
    }

    pub async fn request_detailed(&self, input: ApprovalInput) -> GateReport {
        if input.skip {
            tracing::info!(
                target: "approval_gate.gate",
                gate = %input.gate,
                "skipped by caller, auto-approving"
            );
            return GateReport::auto_approved(&input.gate);
        }
        if self.settings.skip {
            tracing::info!(
                target: "approval_gate.gate",
                gate = %input.gate,
                "skip override set, auto-approving"
            );
            return GateReport::auto_approved(&input.gate);
        }
        if !self.channel.is_configured() {
            tracing::warn!(
                target: "approval_gate.gate",
                gate = %input.gate,
                "approval channel not configured (bot token / chat id), auto-approving"
            );
            return GateReport::auto_approved(&input.gate);
        }

        let _turn = self.in_flight.lock().await;
        let req = ApprovalRequest::from_input(&input, self.settings.default_timeout_secs);
        tracing::info!(
            target: "approval_gate.gate",
            gate = %req.gate,
            correlation_id = %req.correlation_id,
            timeout_secs = req.timeout.as_secs(),
            transport = self.transport.name(),
            "requesting approval"
        );

        with_webhook_suspended(self.transport.clone(), || self.run_protocol(&req)).await
    }

    async fn run_protocol(&self, req: &ApprovalRequest) -> GateReport {
        let transport = self.transport.as_ref();
        let chat_id = self.channel.chat_id.trim();

        let cursor = UpdateCursor::flush(transport).await;

        let Some(message_id) = dispatch(transport, chat_id, req).await else {
            tracing::warn!(
                target: "approval_gate.gate",
                gate = %req.gate,
                "approval message could not be sent, auto-approving"
            );
            return GateReport::new(
                &req.gate,
                Some(&req.correlation_id),
                None,
                Outcome::AutoApproved,
            );
        };

        let now = Instant::now();
        let deadline = now
            .checked_add(req.timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        let expected = ExpectedResponse {
            message_id,
            approve: req.token(Action::Approve),
            reject: req.token(Action::Reject),
        };
        let mut poller = ResponsePoller::new(
            transport,
            expected,
            cursor,
            self.settings.poll_timeout_secs,
            self.settings.max_backoff_secs,
        );
        let outcome = poller.run(deadline).await;

        finalize(transport, chat_id, message_id, &req.compose_text(), outcome).await;

        GateReport::new(&req.gate, Some(&req.correlation_id), Some(message_id), outcome)
    }
}
