//! `ChatTransport` over the Telegram Bot API (`https://api.telegram.org/bot<token>/<method>`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use approval_gate_core::api::{
    AnswerCallbackQuery, ChatTransport, EditMessageText, GateConfig, GetUpdates, SendMessage,
    TelegramConfig, TransportError, Update, WebhookInfo,
};

/// Timeout for every call that is not a long-poll.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

const ERROR_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[derive(Serialize)]
struct SetWebhook<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct Empty {}

pub struct TelegramTransport {
    client: Client,
    api_base: String,
    token: String,
    call_timeout: Duration,
    poll_margin: Duration,
}

impl TelegramTransport {
    pub fn new(cfg: &TelegramConfig, gate: &GateConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            token: cfg.bot_token.trim().to_string(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            poll_margin: Duration::from_secs(gate.request_timeout_margin_secs),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Error text from reqwest embeds the request URL, which carries the token.
    fn sanitize(&self, text: &str) -> String {
        if self.token.is_empty() {
            return text.to_string();
        }
        text.replace(&self.token, "[REDACTED]")
    }

    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Network(self.sanitize(&e.to_string()))
                }
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Network(self.sanitize(&e.to_string()))
            }
        })?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(TransportError::Decode(format!("{method}: {e}")));
            }
            Err(_) => {
                return Err(TransportError::HttpStatus {
                    status: status.as_u16(),
                    description: snippet(&text),
                });
            }
        };

        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                description: envelope.description.unwrap_or_else(|| snippet(&text)),
            });
        }
        if !envelope.ok {
            return Err(TransportError::Api {
                code: envelope.error_code.unwrap_or_default(),
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown Telegram API error".to_string()),
            });
        }

        envelope
            .result
            .ok_or_else(|| TransportError::Decode(format!("{method}: missing result")))
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(ERROR_SNIPPET_CHARS).collect()
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, req: &SendMessage) -> Result<i64, TransportError> {
        let sent: SentMessage = self.call("sendMessage", req, self.call_timeout).await?;
        Ok(sent.message_id)
    }

    async fn edit_message_text(&self, req: &EditMessageText) -> Result<(), TransportError> {
        // Result is the edited Message, or `true` for inline messages.
        let _: serde_json::Value = self.call("editMessageText", req, self.call_timeout).await?;
        Ok(())
    }

    async fn answer_callback_query(
        &self,
        req: &AnswerCallbackQuery,
    ) -> Result<(), TransportError> {
        let _: bool = self
            .call("answerCallbackQuery", req, self.call_timeout)
            .await?;
        Ok(())
    }

    async fn get_updates(&self, req: &GetUpdates) -> Result<Vec<Update>, TransportError> {
        let timeout = Duration::from_secs(req.timeout) + self.poll_margin;
        self.call("getUpdates", req, timeout).await
    }

    async fn get_webhook_url(&self) -> Result<String, TransportError> {
        let info: WebhookInfo = self
            .call("getWebhookInfo", &Empty {}, self.call_timeout)
            .await?;
        Ok(info.url)
    }

    async fn set_webhook(&self, url: &str) -> Result<(), TransportError> {
        let _: bool = self
            .call("setWebhook", &SetWebhook { url }, self.call_timeout)
            .await?;
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<(), TransportError> {
        let _: bool = self
            .call("deleteWebhook", &Empty {}, self.call_timeout)
            .await?;
        tracing::debug!(target: "approval_gate.telegram", "webhook deleted");
        Ok(())
    }
}
