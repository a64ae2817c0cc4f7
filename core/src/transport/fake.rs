//! In-memory transport that records every call and replays scripted polls.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

use super::{
    AnswerCallbackQuery, CallbackMessage, CallbackQuery, ChatTransport, EditMessageText,
    GetUpdates, SendMessage, Update,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetWebhook,
    DeleteWebhook,
    SetWebhook(String),
    GetUpdates(GetUpdates),
    Send(SendMessage),
    Edit(EditMessageText),
    Answer(AnswerCallbackQuery),
}

pub enum PollReply {
    Updates(Vec<Update>),
    /// Click button `index` of the last sent message.
    Press(usize),
    Fail,
    Panic,
}

pub struct FakeTransport {
    calls: Mutex<Vec<Call>>,
    webhook_url: String,
    message_id: Option<i64>,
    flush_backlog: Vec<Update>,
    script: Mutex<VecDeque<PollReply>>,
    next_update_id: Mutex<i64>,
    fail_edits: bool,
    fail_webhook_info: bool,
}

impl FakeTransport {
    pub fn new(message_id: Option<i64>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            webhook_url: String::new(),
            message_id,
            flush_backlog: Vec::new(),
            script: Mutex::new(VecDeque::new()),
            next_update_id: Mutex::new(1000),
            fail_edits: false,
            fail_webhook_info: false,
        }
    }

    pub fn with_webhook(mut self, url: &str) -> Self {
        self.webhook_url = url.to_string();
        self
    }

    pub fn with_backlog(mut self, latest_update_id: i64) -> Self {
        self.flush_backlog = vec![Update {
            update_id: latest_update_id,
            callback_query: None,
        }];
        *self.next_update_id.lock().unwrap() = latest_update_id + 1;
        self
    }

    pub fn with_failing_edits(mut self) -> Self {
        self.fail_edits = true;
        self
    }

    pub fn with_failing_webhook_info(mut self) -> Self {
        self.fail_webhook_info = true;
        self
    }

    pub fn script(self, replies: Vec<PollReply>) -> Self {
        *self.script.lock().unwrap() = replies.into();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn sent(&self) -> Vec<SendMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<EditMessageText> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub fn long_polls(&self) -> Vec<GetUpdates> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::GetUpdates(q) if q.offset != Some(-1) => Some(q),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_update_id(&self) -> i64 {
        let mut id = self.next_update_id.lock().unwrap();
        *id += 1;
        *id
    }
}

pub fn callback_update(update_id: i64, message_id: i64, data: &str) -> Update {
    Update {
        update_id,
        callback_query: Some(CallbackQuery {
            id: format!("cb-{update_id}"),
            data: Some(data.to_string()),
            message: Some(CallbackMessage { message_id }),
        }),
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send_message(&self, req: &SendMessage) -> Result<i64, TransportError> {
        self.record(Call::Send(req.clone()));
        self.message_id.ok_or(TransportError::HttpStatus {
            status: 400,
            description: "chat not found".to_string(),
        })
    }

    async fn edit_message_text(&self, req: &EditMessageText) -> Result<(), TransportError> {
        self.record(Call::Edit(req.clone()));
        if self.fail_edits {
            return Err(TransportError::Network("connection reset".to_string()));
        }
        Ok(())
    }

    async fn answer_callback_query(
        &self,
        req: &AnswerCallbackQuery,
    ) -> Result<(), TransportError> {
        self.record(Call::Answer(req.clone()));
        Ok(())
    }

    async fn get_updates(&self, req: &GetUpdates) -> Result<Vec<Update>, TransportError> {
        self.record(Call::GetUpdates(*req));
        if req.offset == Some(-1) {
            return Ok(self.flush_backlog.clone());
        }

        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(PollReply::Updates(updates)) => Ok(updates),
            Some(PollReply::Press(index)) => {
                let sent = self.sent();
                let last = sent.last().expect("press scripted before any send");
                let markup = last.reply_markup.as_ref().expect("message has buttons");
                let data = markup.inline_keyboard[0][index].callback_data.clone();
                let message_id = self.message_id.expect("press scripted without message id");
                Ok(vec![callback_update(self.next_update_id(), message_id, &data)])
            }
            Some(PollReply::Fail) => Err(TransportError::Network("unreachable".to_string())),
            Some(PollReply::Panic) => panic!("transport blew up"),
            None => {
                // Behave like an idle long-poll: hold for the server-side wait.
                tokio::time::sleep(Duration::from_secs(req.timeout)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn get_webhook_url(&self) -> Result<String, TransportError> {
        self.record(Call::GetWebhook);
        if self.fail_webhook_info {
            return Err(TransportError::Timeout);
        }
        Ok(self.webhook_url.clone())
    }

    async fn set_webhook(&self, url: &str) -> Result<(), TransportError> {
        self.record(Call::SetWebhook(url.to_string()));
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<(), TransportError> {
        self.record(Call::DeleteWebhook);
        Ok(())
    }
}
