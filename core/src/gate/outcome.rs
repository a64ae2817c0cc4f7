use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal result of one gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Approved,
    Rejected,
    TimedOut,
    /// Nobody could be asked (skipped, unconfigured or undeliverable).
    AutoApproved,
}

impl Outcome {
    pub fn approved(&self) -> bool {
        matches!(self, Outcome::Approved | Outcome::AutoApproved)
    }

    /// Marker appended to the message once the gate resolves. Auto-approval
    /// never had a message to edit.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Outcome::Approved => Some("--- APPROVED ---"),
            Outcome::Rejected => Some("--- REJECTED ---"),
            Outcome::TimedOut => Some("--- TIMED OUT ---"),
            Outcome::AutoApproved => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Approved => "approved",
            Outcome::Rejected => "rejected",
            Outcome::TimedOut => "timed_out",
            Outcome::AutoApproved => "auto_approved",
        };
        f.write_str(s)
    }
}
