use blockscout_service_launcher::{
    database::{DatabaseConnectSettings, DatabaseSettings},
    launcher::{ConfigSettings, MetricsSettings, ServerSettings},
    tracing::{JaegerSettings, TracingSettings},
};
use serde::Deserialize;
use sms_gateway_logic::settings::{CarrierSettings, GatewaySettings, QueueSettings};
use url::Url;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
    #[serde(default)]
    pub tracing: TracingSettings,
    #[serde(default)]
    pub jaeger: JaegerSettings,
    pub database: DatabaseSettings,
    pub queue: QueueSettings,
    pub carrier: CarrierSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
}

impl ConfigSettings for Settings {
    const SERVICE_NAME: &'static str = "SMS_GATEWAY";
}

impl Settings {
    pub fn default(database_url: String, queue_url: Url, carrier_url: Url) -> Self {
        Self {
            server: Default::default(),
            metrics: Default::default(),
            tracing: Default::default(),
            jaeger: Default::default(),
            database: DatabaseSettings {
                connect: DatabaseConnectSettings::Url(database_url),
                connect_options: Default::default(),
                create_database: Default::default(),
                run_migrations: Default::default(),
            },
            queue: QueueSettings {
                url: queue_url,
                queue_name: "sms_queue".to_string(),
                pop_timeout: std::time::Duration::from_millis(1000),
            },
            carrier: CarrierSettings {
                url: carrier_url,
                request_timeout: std::time::Duration::from_millis(5000),
            },
            gateway: Default::default(),
        }
    }
}
