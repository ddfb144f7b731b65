use blockscout_service_launcher::test_server;
use reqwest::Url;
use sms_gateway_server::Settings;

pub async fn init_sms_gateway_server<F>(
    db_url: String,
    queue_name: &str,
    carrier_url: Url,
    settings_setup: F,
) -> Url
where
    F: Fn(Settings) -> Settings,
{
    let queue_url: Url = std::env::var("REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
        .parse()
        .expect("invalid redis url");

    let (settings, base) = {
        let mut settings = Settings::default(db_url, queue_url, carrier_url);
        let (server_settings, base) = test_server::get_test_server_settings();
        settings.server = server_settings;
        settings.metrics.enabled = false;
        settings.tracing.enabled = false;
        settings.jaeger.enabled = false;
        settings.queue.queue_name = queue_name.to_string();

        (settings_setup(settings), base)
    };

    test_server::init_server(|| sms_gateway_server::run(settings), &base).await;
    base
}
