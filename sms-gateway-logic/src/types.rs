use chrono::NaiveDateTime;
use entity::{messages, sea_orm_active_enums, users};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type MessageId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub balance: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            balance: model.balance,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    Scheduled,
    Enqueued,
    Sent,
    Failed,
}

impl MessageStatus {
    /// Label used for the per-transition metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Scheduled => "scheduled",
            MessageStatus::Enqueued => "enqueued",
            MessageStatus::Sent => "sent",
            MessageStatus::Failed => "failed",
        }
    }
}

impl From<sea_orm_active_enums::MessageStatus> for MessageStatus {
    fn from(status: sea_orm_active_enums::MessageStatus) -> Self {
        match status {
            sea_orm_active_enums::MessageStatus::Scheduled => MessageStatus::Scheduled,
            sea_orm_active_enums::MessageStatus::Enqueued => MessageStatus::Enqueued,
            sea_orm_active_enums::MessageStatus::Sent => MessageStatus::Sent,
            sea_orm_active_enums::MessageStatus::Failed => MessageStatus::Failed,
        }
    }
}

impl From<MessageStatus> for sea_orm_active_enums::MessageStatus {
    fn from(status: MessageStatus) -> Self {
        match status {
            MessageStatus::Scheduled => sea_orm_active_enums::MessageStatus::Scheduled,
            MessageStatus::Enqueued => sea_orm_active_enums::MessageStatus::Enqueued,
            MessageStatus::Sent => sea_orm_active_enums::MessageStatus::Sent,
            MessageStatus::Failed => sea_orm_active_enums::MessageStatus::Failed,
        }
    }
}

/// A durable message row. Doubles as the runtime-queue wire format
/// (serialized to JSON with camelCase keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub user_id: UserId,
    pub content: String,
    pub receiver: String,
    pub cost: i64,
    pub status: MessageStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<messages::Model> for Message {
    fn from(model: messages::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            content: model.content,
            receiver: model.receiver,
            cost: model.cost,
            status: model.status.into(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A message accepted for admission but not yet persisted. The cost is
/// stamped by the gateway at admission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub content: String,
    pub receiver: String,
    pub cost: i64,
}

impl NewMessage {
    pub fn new(content: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            receiver: receiver.into(),
            cost: 0,
        }
    }
}
