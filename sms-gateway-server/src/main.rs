use blockscout_service_launcher::launcher::ConfigSettings;
use sms_gateway_server::Settings;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let settings = Settings::build().expect("failed to read config");
    sms_gateway_server::run(settings).await
}
