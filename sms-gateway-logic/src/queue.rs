use crate::{settings::QueueSettings, types::Message};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use thiserror::Error;

/// Reply code redis uses when the queue key exists with a non-list shape.
const WRONG_TYPE_CODE: &str = "WRONGTYPE";

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("queue is empty")]
    Empty,
    #[error("queue key holds the wrong kind of value")]
    WrongType,
    #[error("queue serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("redis error: {0}")]
    Redis(redis::RedisError),
}

impl From<redis::RedisError> for QueueError {
    fn from(err: redis::RedisError) -> Self {
        if err.code() == Some(WRONG_TYPE_CODE) {
            QueueError::WrongType
        } else {
            QueueError::Redis(err)
        }
    }
}

/// FIFO of messages in flight. The durable row stays authoritative; the
/// queue only owns a message between the claim and the send attempt.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Appends the batch in slice order.
    async fn push(&self, messages: &[Message]) -> Result<(), QueueError>;
    async fn len(&self) -> Result<usize, QueueError>;
    /// Blocks up to the configured timeout; an idle window yields
    /// [`QueueError::Empty`].
    async fn pop(&self) -> Result<Message, QueueError>;
}

#[derive(Clone)]
pub struct RedisQueue {
    connection: ConnectionManager,
    queue_name: String,
    pop_timeout: Duration,
}

impl RedisQueue {
    pub async fn new(settings: &QueueSettings) -> Result<Self, QueueError> {
        let client = redis::Client::open(settings.url.to_string())?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self {
            connection,
            queue_name: settings.queue_name.clone(),
            pop_timeout: settings.pop_timeout,
        })
    }
}

#[async_trait]
impl MessageQueue for RedisQueue {
    async fn push(&self, messages: &[Message]) -> Result<(), QueueError> {
        if messages.is_empty() {
            return Ok(());
        }
        let payloads = messages
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        let mut connection = self.connection.clone();
        let _: () = connection.lpush(&self.queue_name, payloads).await?;
        Ok(())
    }

    async fn len(&self) -> Result<usize, QueueError> {
        let mut connection = self.connection.clone();
        let length: usize = connection.llen(&self.queue_name).await?;
        Ok(length)
    }

    async fn pop(&self) -> Result<Message, QueueError> {
        let mut connection = self.connection.clone();
        let reply: Option<(String, String)> = connection
            .brpop(&self.queue_name, self.pop_timeout.as_secs_f64())
            .await?;
        let (_, payload) = reply.ok_or(QueueError::Empty)?;
        Ok(serde_json::from_str(&payload)?)
    }
}
