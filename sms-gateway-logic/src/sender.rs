use crate::{settings::CarrierSettings, types::Message};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SendError {
    #[error("carrier rejected the message: {0}")]
    Rejected(String),
    #[error("carrier request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One-shot delivery to the upstream carrier. Failure is terminal for the
/// attempt; the pipeline never retries a send.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, message: &Message) -> Result<(), SendError>;
}

#[derive(Clone)]
pub struct HttpCarrier {
    client: reqwest::Client,
    url: url::Url,
}

impl HttpCarrier {
    pub fn new(settings: &CarrierSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .expect("cannot initialize carrier client");
        Self {
            client,
            url: settings.url.clone(),
        }
    }
}

#[derive(Serialize)]
struct CarrierRequest<'a> {
    receiver: &'a str,
    content: &'a str,
}

#[async_trait]
impl SmsSender for HttpCarrier {
    async fn send(&self, message: &Message) -> Result<(), SendError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&CarrierRequest {
                receiver: &message.receiver,
                content: &message.content,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SendError::Rejected(status.to_string()));
        }
        Ok(())
    }
}
