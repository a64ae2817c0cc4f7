//! Push delivery and `getUpdates` are mutually exclusive for one bot, so the
//! webhook is taken down for the duration of a gate and put back afterwards.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::transport::ChatTransport;

/// Returns the URL that was registered before, possibly empty. The delete is
/// issued even when nothing was registered: a crashed poller can leave the
/// bot in a conflicted state only an explicit delete clears.
pub async fn suspend(transport: &dyn ChatTransport) -> String {
    let previous = match transport.get_webhook_url().await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(
                target: "approval_gate.webhook",
                error = %e,
                "getWebhookInfo failed, previous webhook unknown and will not be restored"
            );
            String::new()
        }
    };

    if let Err(e) = transport.delete_webhook().await {
        tracing::warn!(
            target: "approval_gate.webhook",
            error = %e,
            "deleteWebhook failed"
        );
    }

    if !previous.is_empty() {
        tracing::info!(target: "approval_gate.webhook", url = %previous, "webhook suspended");
    }
    previous
}

pub async fn restore(transport: &dyn ChatTransport, previous: &str) {
    if previous.is_empty() {
        return;
    }
    match transport.set_webhook(previous).await {
        Ok(()) => {
            tracing::info!(target: "approval_gate.webhook", url = %previous, "webhook restored")
        }
        Err(e) => tracing::warn!(
            target: "approval_gate.webhook",
            url = %previous,
            error = %e,
            "failed to restore webhook"
        ),
    }
}

/// Runs `body` with the webhook suspended. Restore happens exactly once on
/// every exit: normal return, panic (re-raised afterwards), or the returned
/// future being dropped mid-flight (restore is then spawned on the runtime).
pub async fn with_webhook_suspended<F, Fut, T>(transport: Arc<dyn ChatTransport>, body: F) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let previous = suspend(transport.as_ref()).await;
    let mut guard = RestoreOnDrop {
        transport: transport.clone(),
        previous,
        armed: true,
    };

    let result = AssertUnwindSafe(async { body().await })
        .catch_unwind()
        .await;

    guard.armed = false;
    restore(transport.as_ref(), &guard.previous).await;

    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

struct RestoreOnDrop {
    transport: Arc<dyn ChatTransport>,
    previous: String,
    armed: bool,
}

impl Drop for RestoreOnDrop {
    fn drop(&mut self) {
        if !self.armed || self.previous.is_empty() {
            return;
        }
        let transport = self.transport.clone();
        let previous = std::mem::take(&mut self.previous);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    restore(transport.as_ref(), &previous).await;
                });
            }
            Err(_) => tracing::error!(
                target: "approval_gate.webhook",
                url = %previous,
                "gate cancelled outside a runtime, webhook left unregistered"
            ),
        }
    }
}
