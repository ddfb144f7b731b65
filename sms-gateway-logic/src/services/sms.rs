use crate::{
    error::ServiceError,
    queue::MessageQueue,
    repository::MessageStore,
    sender::SmsSender,
    types::{Message, MessageId, NewMessage, UserId},
};
use std::sync::Arc;

pub struct SmsService {
    store: Arc<dyn MessageStore>,
    queue: Arc<dyn MessageQueue>,
    sender: Arc<dyn SmsSender>,
    queue_capacity: usize,
}

impl SmsService {
    pub fn new(
        store: Arc<dyn MessageStore>,
        queue: Arc<dyn MessageQueue>,
        sender: Arc<dyn SmsSender>,
        queue_capacity: usize,
    ) -> Self {
        Self {
            store,
            queue,
            sender,
            queue_capacity,
        }
    }

    /// Durably records the batch as SCHEDULED. Balance bookkeeping belongs
    /// to the gateway, not here.
    pub async fn schedule(
        &self,
        user_id: UserId,
        messages: &[NewMessage],
    ) -> Result<(), ServiceError> {
        self.store.create_scheduled(user_id, messages).await
    }

    pub async fn list_user(
        &self,
        user_id: UserId,
        skip: u64,
        limit: u64,
        descending: bool,
    ) -> Result<Vec<Message>, ServiceError> {
        self.store.list_by_user(user_id, skip, limit, descending).await
    }

    /// Transfers up to `count` of the oldest SCHEDULED rows into the runtime
    /// queue and returns how many actually moved. The capacity check happens
    /// before any durable work; a failed push is compensated by flipping the
    /// claimed rows back to SCHEDULED.
    pub async fn enqueue_earliest(&self, count: usize) -> Result<usize, ServiceError> {
        let queue_len = self.queue.len().await?;
        if queue_len + count > self.queue_capacity {
            return Err(ServiceError::NoCapacity);
        }

        let claimed = self.store.claim_earliest(count as u64).await?;
        if claimed.is_empty() {
            return Ok(0);
        }

        if let Err(push_err) = self.queue.push(&claimed).await {
            let ids = claimed.iter().map(|message| message.id).collect::<Vec<_>>();
            tracing::warn!(
                error = %push_err,
                count = ids.len(),
                "queue push failed after claim, rescheduling messages"
            );
            // If the reschedule fails too, its error wins: only its success
            // restores the claim/queue invariant.
            self.store.reschedule(&ids).await?;
            return Err(push_err.into());
        }

        Ok(claimed.len())
    }

    /// Pops one message and finalizes it. A FAILED result is a normal
    /// return, not an error: it is the terminal outcome of this attempt.
    pub async fn send_from_queue(&self) -> Result<Message, ServiceError> {
        let message = self.queue.pop().await?;

        match self.sender.send(&message).await {
            Ok(()) => self.set_sent(message.id).await,
            Err(err) => {
                tracing::warn!(message_id = message.id, error = %err, "carrier send failed");
                self.set_failed(message.id).await
            }
        }
    }

    pub async fn set_sent(&self, id: MessageId) -> Result<Message, ServiceError> {
        self.store.mark_sent(id).await
    }

    pub async fn set_failed(&self, id: MessageId) -> Result<Message, ServiceError> {
        self.store.mark_failed(id).await
    }
}
