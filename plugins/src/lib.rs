pub mod factory;
pub mod telegram;

pub use factory::{build_gate, build_transport, request_approval};
pub use telegram::TelegramTransport;
