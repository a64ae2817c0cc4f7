use std::time::Duration;

use super::token::{new_correlation_id, sanitize_gate_name, Action, ActionToken};

/// What a caller hands to the gate.
#[derive(Debug, Clone, Default)]
pub struct ApprovalInput {
    pub gate: String,
    pub summary: String,
    pub details: Vec<String>,
    pub context_id: Option<String>,
    /// Falls back to `gate.default_timeout_secs` when unset.
    pub timeout_secs: Option<u64>,
    pub skip: bool,
}

impl ApprovalInput {
    pub fn new(gate: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            gate: gate.into(),
            summary: summary.into(),
            ..Self::default()
        }
    }

    pub fn details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }

    pub fn context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }
}

/// One outstanding decision. Built once per call and never mutated.
#[derive(Debug, Clone)]
pub struct ApprovalRequest {
    pub gate: String,
    pub correlation_id: String,
    pub summary: String,
    pub details: Vec<String>,
    pub context_id: Option<String>,
    pub timeout: Duration,
}

impl ApprovalRequest {
    pub fn from_input(input: &ApprovalInput, default_timeout_secs: u64) -> Self {
        Self {
            gate: sanitize_gate_name(&input.gate),
            correlation_id: new_correlation_id(),
            summary: input.summary.clone(),
            details: input.details.clone(),
            context_id: input
                .context_id
                .as_ref()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            timeout: Duration::from_secs(input.timeout_secs.unwrap_or(default_timeout_secs)),
        }
    }

    pub fn token(&self, action: Action) -> ActionToken {
        ActionToken::new(self.gate.clone(), self.correlation_id.clone(), action)
    }

    /// Summary, optional context line and the detail block, separated by
    /// blank lines.
    pub fn compose_text(&self) -> String {
        let mut parts = vec![self.summary.clone()];
        if let Some(ctx) = &self.context_id {
            parts.push(format!("Video: {ctx}"));
        }
        if !self.details.is_empty() {
            parts.push(self.details.join("\n"));
        }
        parts.join("\n\n")
    }
}
