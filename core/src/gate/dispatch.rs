use crate::error::TokenError;
use crate::transport::{ChatTransport, InlineKeyboardButton, InlineKeyboardMarkup, SendMessage};

use super::request::ApprovalRequest;
use super::token::Action;

pub const APPROVE_LABEL: &str = "Approve";
pub const REJECT_LABEL: &str = "Reject";

pub fn approval_message(chat_id: &str, req: &ApprovalRequest) -> Result<SendMessage, TokenError> {
    let approve = req.token(Action::Approve).encode()?;
    let reject = req.token(Action::Reject).encode()?;

    Ok(SendMessage {
        chat_id: chat_id.to_string(),
        text: req.compose_text(),
        reply_markup: Some(InlineKeyboardMarkup {
            inline_keyboard: vec![vec![
                InlineKeyboardButton {
                    text: APPROVE_LABEL.to_string(),
                    callback_data: approve,
                },
                InlineKeyboardButton {
                    text: REJECT_LABEL.to_string(),
                    callback_data: reject,
                },
            ]],
        }),
    })
}

/// Sends the actionable message. `None` means nobody can be asked.
pub async fn dispatch(
    transport: &dyn ChatTransport,
    chat_id: &str,
    req: &ApprovalRequest,
) -> Option<i64> {
    let msg = match approval_message(chat_id, req) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!(
                target: "approval_gate.gate",
                gate = %req.gate,
                error = %e,
                "cannot encode approval buttons"
            );
            return None;
        }
    };

    match transport.send_message(&msg).await {
        Ok(message_id) => {
            tracing::debug!(
                target: "approval_gate.gate",
                gate = %req.gate,
                correlation_id = %req.correlation_id,
                message_id,
                "approval message sent"
            );
            Some(message_id)
        }
        Err(e) => {
            tracing::warn!(
                target: "approval_gate.gate",
                gate = %req.gate,
                error = %e,
                "sendMessage failed"
            );
            None
        }
    }
}
