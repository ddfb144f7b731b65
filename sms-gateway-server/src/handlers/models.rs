use serde::{Deserialize, Serialize};
use sms_gateway_logic::types::{Message, MessageStatus, NewMessage, User};

/// Response envelope shared by every endpoint: a payload or a
/// human-readable message, never both.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            message: String::new(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct IncreaseBalanceRequest {
    pub balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct SmsRequest {
    pub content: String,
    pub receiver: String,
}

impl From<SmsRequest> for NewMessage {
    fn from(request: SmsRequest) -> Self {
        NewMessage::new(request.content, request.receiver)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListMessagesQuery {
    pub skip: u64,
    pub limit: u64,
    pub desc: bool,
}

impl Default for ListMessagesQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 50,
            desc: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub balance: i64,
    pub created_at: chrono::NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            balance: user.balance,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub balance: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsResponse {
    pub id: i64,
    pub content: String,
    pub receiver: String,
    pub status: String,
    pub cost: i64,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<Message> for SmsResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            content: message.content,
            receiver: message.receiver,
            status: status_name(message.status).to_string(),
            cost: message.cost,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

fn status_name(status: MessageStatus) -> &'static str {
    match status {
        MessageStatus::Scheduled => "Scheduled",
        MessageStatus::Enqueued => "Enqueued",
        MessageStatus::Sent => "Sent",
        MessageStatus::Failed => "Failed",
    }
}
