//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `approval_gate_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, load_from, AppConfig, GateConfig, LoggingConfig, TelegramConfig,
};
pub use crate::error::{ConfigError, TokenError, TransportError};
pub use crate::gate::{
    Action, ActionToken, ApprovalGate, ApprovalInput, ApprovalRequest, GateReport, Outcome,
};
pub use crate::transport::{
    AnswerCallbackQuery, ChatTransport, EditMessageText, GetUpdates, SendMessage, Update,
    WebhookInfo,
};
