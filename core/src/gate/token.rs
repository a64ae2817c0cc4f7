//! Callback-data codec for the two approval buttons.
//!
//! Wire form: `<namespace>:<gate>:<correlation id>:<approve|reject>`.
//! The namespace keeps these tokens apart from any other callback scheme the
//! same bot handles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

pub const NAMESPACE: &str = "apgate";

/// Telegram rejects `callback_data` longer than this.
pub const MAX_CALLBACK_DATA_BYTES: usize = 64;

pub const CORRELATION_ID_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Approve,
    Reject,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Approve => "approve",
            Action::Reject => "reject",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Action::Approve),
            "reject" => Ok(Action::Reject),
            other => Err(TokenError::UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionToken {
    pub gate: String,
    pub correlation_id: String,
    pub action: Action,
}

impl ActionToken {
    pub fn new(gate: impl Into<String>, correlation_id: impl Into<String>, action: Action) -> Self {
        Self {
            gate: gate.into(),
            correlation_id: correlation_id.into(),
            action,
        }
    }

    pub fn encode(&self) -> Result<String, TokenError> {
        for (field, value) in [("gate", &self.gate), ("correlation id", &self.correlation_id)] {
            if value.is_empty() || value.contains(':') {
                return Err(TokenError::Malformed(format!("invalid {field}: {value:?}")));
            }
        }

        let encoded = format!(
            "{NAMESPACE}:{}:{}:{}",
            self.gate, self.correlation_id, self.action
        );
        if encoded.len() > MAX_CALLBACK_DATA_BYTES {
            return Err(TokenError::TooLong {
                len: encoded.len(),
                limit: MAX_CALLBACK_DATA_BYTES,
            });
        }
        Ok(encoded)
    }

    pub fn decode(data: &str) -> Result<Self, TokenError> {
        let Some(rest) = data
            .strip_prefix(NAMESPACE)
            .and_then(|r| r.strip_prefix(':'))
        else {
            return Err(TokenError::WrongNamespace);
        };

        let parts: Vec<&str> = rest.split(':').collect();
        let [gate, correlation_id, action] = parts.as_slice() else {
            return Err(TokenError::Malformed(data.to_string()));
        };
        if gate.is_empty() || correlation_id.is_empty() {
            return Err(TokenError::Malformed(data.to_string()));
        }

        Ok(Self {
            gate: gate.to_string(),
            correlation_id: correlation_id.to_string(),
            action: action.parse()?,
        })
    }
}

/// Makes an arbitrary gate name safe to embed: separators and whitespace
/// become `_`, and the result is cut so the longest token still fits.
pub fn sanitize_gate_name(name: &str) -> String {
    let budget = MAX_CALLBACK_DATA_BYTES
        - NAMESPACE.len()
        - CORRELATION_ID_LEN
        - Action::Approve.as_str().len()
        - 3;

    let mut out = String::new();
    for c in name.trim().chars() {
        let c = if c == ':' || c.is_whitespace() { '_' } else { c };
        if out.len() + c.len_utf8() > budget {
            break;
        }
        out.push(c);
    }

    if out.is_empty() {
        out.push_str("gate");
    }
    out
}

pub fn new_correlation_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(CORRELATION_ID_LEN);
    id
}
