use crate::transport::{ChatTransport, GetUpdates};

/// Last update id fully consumed by this call. Never shared between calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateCursor {
    last: Option<i64>,
}

impl UpdateCursor {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<i64> {
        self.last
    }

    /// Offset for the next `getUpdates`; `None` until a baseline exists.
    pub fn next_offset(&self) -> Option<i64> {
        self.last.map(|id| id + 1)
    }

    /// Moves forward only.
    pub fn advance(&mut self, update_id: i64) {
        self.last = Some(match self.last {
            Some(prev) => prev.max(update_id),
            None => update_id,
        });
    }

    /// Baseline at the newest pending update so backlog from earlier runs is
    /// never replayed. Failure leaves the cursor unset, which is valid.
    pub async fn flush(transport: &dyn ChatTransport) -> Self {
        let mut cursor = Self::unset();
        match transport.get_updates(&GetUpdates::latest()).await {
            Ok(updates) => {
                if let Some(latest) = updates.iter().map(|u| u.update_id).max() {
                    cursor.advance(latest);
                }
            }
            Err(e) => {
                tracing::debug!(
                    target: "approval_gate.poll",
                    error = %e,
                    "flush failed, cursor starts unset"
                );
            }
        }
        tracing::debug!(
            target: "approval_gate.poll",
            baseline = ?cursor.last,
            "update cursor flushed"
        );
        cursor
    }
}
