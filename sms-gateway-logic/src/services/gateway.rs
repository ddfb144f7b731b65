use crate::{
    error::ServiceError,
    services::{SmsService, UserService},
    settings::GatewaySettings,
    types::{Message, MessageStatus, NewMessage, User, UserId},
};
use std::sync::Arc;

/// Top-level dispatch coordinator: the admission path plus the step
/// functions driven by the background workers.
pub struct SmsGateway {
    users: Arc<UserService>,
    sms: Arc<SmsService>,
    settings: GatewaySettings,
}

impl SmsGateway {
    pub fn new(settings: GatewaySettings, users: Arc<UserService>, sms: Arc<SmsService>) -> Self {
        Self {
            users,
            sms,
            settings,
        }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    pub async fn create_user(&self, name: &str) -> Result<User, ServiceError> {
        self.users.create(name).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.users.get(id).await
    }

    pub async fn get_user_messages(
        &self,
        user_id: UserId,
        skip: u64,
        limit: u64,
        descending: bool,
    ) -> Result<Vec<Message>, ServiceError> {
        self.users.get(user_id).await?;
        self.sms.list_user(user_id, skip, limit, descending).await
    }

    pub async fn increase_user_balance(
        &self,
        user_id: UserId,
        amount: i64,
    ) -> Result<i64, ServiceError> {
        self.users.increase_balance(user_id, amount).await
    }

    pub async fn send_single(
        &self,
        user_id: UserId,
        message: NewMessage,
    ) -> Result<(), ServiceError> {
        self.admit(user_id, vec![message]).await
    }

    /// All-or-nothing: either every message in the batch is scheduled, or
    /// the whole debit is rolled back.
    pub async fn send_bulk(
        &self,
        user_id: UserId,
        messages: Vec<NewMessage>,
    ) -> Result<(), ServiceError> {
        self.admit(user_id, messages).await
    }

    async fn admit(
        &self,
        user_id: UserId,
        messages: Vec<NewMessage>,
    ) -> Result<(), ServiceError> {
        let user = self.users.get(user_id).await?;

        let total_cost = self.settings.message_cost * messages.len() as i64;
        // Optimistic pre-check; the debit below stays authoritative under
        // concurrent admissions.
        if user.balance < total_cost {
            return Err(ServiceError::InsufficientBalance);
        }

        let messages = messages
            .into_iter()
            .map(|mut message| {
                message.cost = self.settings.message_cost;
                message
            })
            .collect::<Vec<_>>();

        self.users.decrease_balance(user_id, total_cost).await?;

        // Once the debit has committed, the schedule and any compensation
        // must outlive the request: run them on a task the caller awaits but
        // cannot cancel by dropping the request future.
        let users = Arc::clone(&self.users);
        let sms = Arc::clone(&self.sms);
        tokio::spawn(async move {
            match sms.schedule(user_id, &messages).await {
                Ok(()) => Ok(()),
                Err(schedule_err) => {
                    if let Err(credit_err) = users.increase_balance(user_id, total_cost).await {
                        tracing::error!(
                            user_id,
                            amount = total_cost,
                            error = %credit_err,
                            "compensating credit failed, balance must be reconciled manually"
                        );
                    }
                    // The scheduling failure is the cause; report it even
                    // when the credit failed too.
                    Err(schedule_err)
                }
            }
        })
        .await
        .map_err(|join_err| ServiceError::Internal(join_err.into()))?
    }

    /// One enqueue-worker iteration: transfer the next claim batch.
    pub(crate) async fn enqueue_once(&self) -> Result<usize, ServiceError> {
        self.sms.enqueue_earliest(self.settings.enqueue_count).await
    }

    /// One send-worker iteration: drain a single message and refund its cost
    /// if the carrier rejected it. A refund failure is logged, never fatal:
    /// the durable row is already FAILED.
    pub(crate) async fn send_once(&self) -> Result<(), ServiceError> {
        let message = self.sms.send_from_queue().await?;

        if message.status == MessageStatus::Failed {
            if let Err(err) = self
                .users
                .increase_balance(message.user_id, message.cost)
                .await
            {
                tracing::error!(
                    message_id = message.id,
                    user_id = message.user_id,
                    amount = message.cost,
                    error = %err,
                    "failed to refund user after failed send"
                );
            }
        }
        Ok(())
    }
}
