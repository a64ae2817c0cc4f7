mod types;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::TransportError;

pub use types::{
    AnswerCallbackQuery, CallbackMessage, CallbackQuery, EditMessageText, GetUpdates,
    InlineKeyboardButton, InlineKeyboardMarkup, SendMessage, Update, WebhookInfo,
};

/// The messaging-platform calls the gate needs. Implementations own timeouts
/// and normalize every failure into a `TransportError`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the platform's id of the created message.
    async fn send_message(&self, req: &SendMessage) -> Result<i64, TransportError>;

    async fn edit_message_text(&self, req: &EditMessageText) -> Result<(), TransportError>;

    async fn answer_callback_query(&self, req: &AnswerCallbackQuery)
        -> Result<(), TransportError>;

    async fn get_updates(&self, req: &GetUpdates) -> Result<Vec<Update>, TransportError>;

    /// Currently registered push endpoint, empty when none.
    async fn get_webhook_url(&self) -> Result<String, TransportError>;

    async fn set_webhook(&self, url: &str) -> Result<(), TransportError>;

    async fn delete_webhook(&self) -> Result<(), TransportError>;
}
