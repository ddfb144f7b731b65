pub mod messages;
pub mod users;

#[cfg(test)]
mod tests;

use crate::{
    error::ServiceError,
    types::{Message, MessageId, NewMessage, User, UserId},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Durable user state. Balance mutation is a single-row atomic operation;
/// the store refuses negative results.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, name: &str) -> Result<User, ServiceError>;
    async fn get(&self, id: UserId) -> Result<User, ServiceError>;
    async fn update_balance(&self, id: UserId, delta: i64) -> Result<i64, ServiceError>;
}

/// Durable message state and the scheduled-to-enqueued claim primitive.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create_scheduled(
        &self,
        user_id: UserId,
        messages: &[NewMessage],
    ) -> Result<(), ServiceError>;
    async fn list_by_user(
        &self,
        user_id: UserId,
        skip: u64,
        limit: u64,
        descending: bool,
    ) -> Result<Vec<Message>, ServiceError>;
    async fn claim_earliest(&self, count: u64) -> Result<Vec<Message>, ServiceError>;
    async fn mark_sent(&self, id: MessageId) -> Result<Message, ServiceError>;
    async fn mark_failed(&self, id: MessageId) -> Result<Message, ServiceError>;
    async fn reschedule(&self, ids: &[MessageId]) -> Result<(), ServiceError>;
}

#[derive(Clone)]
pub struct PostgresStore {
    db: Arc<DatabaseConnection>,
}

impl PostgresStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn create(&self, name: &str) -> Result<User, ServiceError> {
        users::create(&self.db, name).await
    }

    async fn get(&self, id: UserId) -> Result<User, ServiceError> {
        users::get(&self.db, id).await
    }

    async fn update_balance(&self, id: UserId, delta: i64) -> Result<i64, ServiceError> {
        users::update_balance(&self.db, id, delta).await
    }
}

#[async_trait]
impl MessageStore for PostgresStore {
    async fn create_scheduled(
        &self,
        user_id: UserId,
        new_messages: &[NewMessage],
    ) -> Result<(), ServiceError> {
        messages::create_scheduled(&self.db, user_id, new_messages).await
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        skip: u64,
        limit: u64,
        descending: bool,
    ) -> Result<Vec<Message>, ServiceError> {
        messages::list_by_user(&self.db, user_id, skip, limit, descending).await
    }

    async fn claim_earliest(&self, count: u64) -> Result<Vec<Message>, ServiceError> {
        messages::claim_earliest(&self.db, count).await
    }

    async fn mark_sent(&self, id: MessageId) -> Result<Message, ServiceError> {
        messages::mark_sent(&self.db, id).await
    }

    async fn mark_failed(&self, id: MessageId) -> Result<Message, ServiceError> {
        messages::mark_failed(&self.db, id).await
    }

    async fn reschedule(&self, ids: &[MessageId]) -> Result<(), ServiceError> {
        messages::reschedule(&self.db, ids).await
    }
}
