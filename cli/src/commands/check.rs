use approval_gate_core::api::AppConfig;
use serde_json::{json, Value};

use super::cli::CheckArgs;

/// Channel status without touching the network. The token itself is never
/// printed.
pub fn status(cfg: &AppConfig) -> Value {
    json!({
        "configured": cfg.telegram.is_configured(),
        "bot_token_set": !cfg.telegram.bot_token.trim().is_empty(),
        "chat_id": cfg.telegram.chat_id.trim(),
        "api_base": cfg.telegram.api_base,
        "skip": cfg.gate.skip,
        "default_timeout_secs": cfg.gate.default_timeout_secs,
    })
}

/// Exits 0 when a gate would actually ask someone, 1 when it would auto-approve.
pub fn run(cfg: &AppConfig, args: CheckArgs) -> i32 {
    let configured = cfg.telegram.is_configured();

    if args.json {
        println!("{}", status(cfg));
    } else if cfg.gate.skip {
        println!("skip override set: every gate auto-approves");
    } else if configured {
        println!("approval channel configured (chat {})", cfg.telegram.chat_id.trim());
    } else {
        println!("approval channel not configured: set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID");
    }

    if configured && !cfg.gate.skip {
        0
    } else {
        1
    }
}
