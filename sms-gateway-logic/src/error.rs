use crate::{queue::QueueError, sender::SendError};
use sea_orm::DbErr;
use thiserror::Error;

/// Check-constraint names the store reports back; recognizing them is part
/// of the schema contract.
const USER_NAME_EMPTY: &str = "user_name_empty";
const USER_INSUFFICIENT_BALANCE: &str = "user_insufficient_balance";
const MESSAGE_CONTENT_EMPTY: &str = "message_content_empty";
const MESSAGE_RECEIVER_EMPTY: &str = "message_receiver_empty";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("user name is empty")]
    EmptyName,
    #[error("message content is empty")]
    EmptyContent,
    #[error("message receiver is empty")]
    EmptyReceiver,
    #[error("balance amount must not be negative")]
    InvalidBalance,
    #[error("user does not exist")]
    UserNotFound,
    #[error("message does not exist")]
    MessageNotFound,
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("queue has no free capacity")]
    NoCapacity,
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Send(#[from] SendError),
    #[error("db error: {0}")]
    Db(DbErr),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        let text = err.to_string();
        if text.contains(USER_NAME_EMPTY) {
            ServiceError::EmptyName
        } else if text.contains(USER_INSUFFICIENT_BALANCE) {
            ServiceError::InsufficientBalance
        } else if text.contains(MESSAGE_CONTENT_EMPTY) {
            ServiceError::EmptyContent
        } else if text.contains(MESSAGE_RECEIVER_EMPTY) {
            ServiceError::EmptyReceiver
        } else {
            ServiceError::Db(err)
        }
    }
}

impl ServiceError {
    /// A worker that observes a fatal error must stop; everything else is
    /// retried on the next loop iteration.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::Queue(QueueError::WrongType))
    }
}
