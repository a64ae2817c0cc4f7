use crate::transport::{ChatTransport, EditMessageText};

use super::outcome::Outcome;

pub fn finalized_text(original: &str, outcome: Outcome) -> Option<String> {
    outcome
        .marker()
        .map(|marker| format!("{original}\n\n{marker}"))
}

/// Rewrites the approval message with its terminal marker. Editing without a
/// `reply_markup` drops the buttons. Failures are logged and ignored.
pub async fn finalize(
    transport: &dyn ChatTransport,
    chat_id: &str,
    message_id: i64,
    original: &str,
    outcome: Outcome,
) {
    let Some(text) = finalized_text(original, outcome) else {
        return;
    };

    let req = EditMessageText {
        chat_id: chat_id.to_string(),
        message_id,
        text,
    };
    if let Err(e) = transport.edit_message_text(&req).await {
        tracing::warn!(
            target: "approval_gate.gate",
            message_id,
            error = %e,
            "editMessageText failed, leaving message as sent"
        );
    }
}
