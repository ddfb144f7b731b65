use serde::Deserialize;
use serde_with::serde_as;
use std::time::Duration;
use url::Url;

/// Tunables of the dispatch pipeline itself.
#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GatewaySettings {
    /// Charge per message, in currency minor units.
    pub message_cost: i64,
    /// Batch size of a single scheduled-to-enqueued transfer.
    pub enqueue_count: usize,
    /// Maximum runtime-queue length before transfers are refused.
    pub queue_capacity: usize,
    pub send_worker_count: usize,
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub full_capacity_sleep: Duration,
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub empty_enqueue_sleep: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            message_cost: 100,
            enqueue_count: 10,
            queue_capacity: 1000,
            send_worker_count: 4,
            full_capacity_sleep: Duration::from_millis(1000),
            empty_enqueue_sleep: Duration::from_millis(1000),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct QueueSettings {
    pub url: Url,
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
    /// Upper bound of a single blocking pop.
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_pop_timeout")]
    pub pop_timeout: Duration,
}

fn default_queue_name() -> String {
    "sms_queue".to_string()
}

fn default_pop_timeout() -> Duration {
    Duration::from_millis(1000)
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CarrierSettings {
    pub url: Url,
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

fn default_request_timeout() -> Duration {
    Duration::from_millis(5000)
}
