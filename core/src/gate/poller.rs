//! Long-polls for the operator's button press on one outstanding message.
//!
//! `Sent -> Polling -> Resolved(Approved | Rejected) | TimedOut`. Transport
//! failures back off and retry until the deadline; every returned update
//! advances the cursor, matching or not, so nothing is redelivered.

use tokio::time::Instant;

use crate::transport::{AnswerCallbackQuery, ChatTransport, GetUpdates, Update};

use super::backoff::Backoff;
use super::cursor::UpdateCursor;
use super::outcome::Outcome;
use super::token::{Action, ActionToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Sent,
    Polling,
    Resolved(Outcome),
    TimedOut,
}

/// Identity of the one response this poller will accept.
#[derive(Debug, Clone)]
pub struct ExpectedResponse {
    pub message_id: i64,
    pub approve: ActionToken,
    pub reject: ActionToken,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Not a button press.
    NotAction,
    /// A press on some other message.
    ForeignMessage,
    /// Right message, but a token this request did not mint.
    ForeignToken,
    Match {
        action: Action,
        callback_query_id: &'a str,
    },
}

pub fn classify<'a>(update: &'a Update, expected: &ExpectedResponse) -> Classification<'a> {
    let Some(cb) = update.callback_query.as_ref() else {
        return Classification::NotAction;
    };
    if cb.message.as_ref().map(|m| m.message_id) != Some(expected.message_id) {
        return Classification::ForeignMessage;
    }

    let Some(token) = cb.data.as_deref().and_then(|d| ActionToken::decode(d).ok()) else {
        return Classification::ForeignToken;
    };
    let action = if token == expected.approve {
        Action::Approve
    } else if token == expected.reject {
        Action::Reject
    } else {
        return Classification::ForeignToken;
    };

    Classification::Match {
        action,
        callback_query_id: &cb.id,
    }
}

pub struct ResponsePoller<'a> {
    transport: &'a dyn ChatTransport,
    expected: ExpectedResponse,
    cursor: UpdateCursor,
    backoff: Backoff,
    poll_timeout_secs: u64,
    state: PollState,
}

impl<'a> ResponsePoller<'a> {
    pub fn new(
        transport: &'a dyn ChatTransport,
        expected: ExpectedResponse,
        cursor: UpdateCursor,
        poll_timeout_secs: u64,
        max_backoff_secs: u64,
    ) -> Self {
        Self {
            transport,
            expected,
            cursor,
            backoff: Backoff::with_max_secs(max_backoff_secs),
            poll_timeout_secs: poll_timeout_secs.max(1),
            state: PollState::Sent,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn cursor(&self) -> UpdateCursor {
        self.cursor
    }

    /// Blocks until a matching press or `deadline`. Returns `Approved`,
    /// `Rejected` or `TimedOut`.
    pub async fn run(&mut self, deadline: Instant) -> Outcome {
        self.state = PollState::Polling;

        loop {
            let now = Instant::now();
            if now >= deadline {
                tracing::info!(
                    target: "approval_gate.poll",
                    message_id = self.expected.message_id,
                    "no response before deadline"
                );
                self.state = PollState::TimedOut;
                return Outcome::TimedOut;
            }

            let wait = (deadline - now).as_secs().clamp(1, self.poll_timeout_secs);
            let query = GetUpdates::long_poll(self.cursor.next_offset(), wait);

            let updates = match self.transport.get_updates(&query).await {
                Ok(updates) => updates,
                Err(e) => {
                    let delay = self.backoff.next_delay();
                    if e.is_retryable() {
                        tracing::debug!(
                            target: "approval_gate.poll",
                            error = %e,
                            ?delay,
                            "poll failed, backing off"
                        );
                    } else {
                        tracing::warn!(
                            target: "approval_gate.poll",
                            error = %e,
                            ?delay,
                            "poll failed, backing off"
                        );
                    }
                    tokio::time::sleep_until((Instant::now() + delay).min(deadline)).await;
                    continue;
                }
            };
            self.backoff.reset();

            for update in &updates {
                self.cursor.advance(update.update_id);

                match classify(update, &self.expected) {
                    Classification::Match {
                        action,
                        callback_query_id,
                    } => {
                        let outcome = match action {
                            Action::Approve => Outcome::Approved,
                            Action::Reject => Outcome::Rejected,
                        };
                        self.acknowledge(callback_query_id, outcome).await;
                        tracing::info!(
                            target: "approval_gate.poll",
                            gate = %self.expected.approve.gate,
                            correlation_id = %self.expected.approve.correlation_id,
                            %outcome,
                            "operator responded"
                        );
                        self.state = PollState::Resolved(outcome);
                        return outcome;
                    }
                    skipped => {
                        tracing::trace!(
                            target: "approval_gate.poll",
                            update_id = update.update_id,
                            ?skipped,
                            "update skipped"
                        );
                    }
                }
            }
        }
    }

    async fn acknowledge(&self, callback_query_id: &str, outcome: Outcome) {
        let text = match outcome {
            Outcome::Approved => "Approved",
            _ => "Rejected",
        };
        let req = AnswerCallbackQuery {
            callback_query_id: callback_query_id.to_string(),
            text: text.to_string(),
        };
        if let Err(e) = self.transport.answer_callback_query(&req).await {
            tracing::debug!(
                target: "approval_gate.poll",
                error = %e,
                "answerCallbackQuery failed"
            );
        }
    }
}
