use crate::{
    handlers,
    health::{self, HealthState},
    settings::Settings,
};
use blockscout_service_launcher::{
    database,
    launcher::{self, LaunchSettings},
};
use migration::Migrator;
use sms_gateway_logic::{
    queue::RedisQueue,
    repository::PostgresStore,
    sender::HttpCarrier,
    services::{SmsGateway, SmsService, UserService},
    workers,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const SERVICE_NAME: &str = "sms_gateway";

#[derive(Clone)]
struct Router {
    gateway: Arc<SmsGateway>,
    health: Arc<HealthState>,
}

impl launcher::HttpRouter for Router {
    fn register_routes(&self, service_config: &mut actix_web::web::ServiceConfig) {
        handlers::configure(service_config, self.gateway.clone(), self.health.clone());
    }
}

pub async fn run(settings: Settings) -> Result<(), anyhow::Error> {
    blockscout_service_launcher::tracing::init_logs(
        SERVICE_NAME,
        &settings.tracing,
        &settings.jaeger,
    )?;

    let db_connection = database::initialize_postgres::<Migrator>(&settings.database).await?;
    let db_connection = Arc::new(db_connection);

    let store = Arc::new(PostgresStore::new(db_connection));
    let queue = Arc::new(RedisQueue::new(&settings.queue).await?);
    let carrier = Arc::new(HttpCarrier::new(&settings.carrier));

    let users = Arc::new(UserService::new(store.clone()));
    let sms = Arc::new(SmsService::new(
        store,
        queue,
        carrier,
        settings.gateway.queue_capacity,
    ));
    let gateway = Arc::new(SmsGateway::new(settings.gateway.clone(), users, sms));

    let shutdown = CancellationToken::new();
    let worker_handles = workers::start(gateway.clone(), shutdown.clone());

    let health_state = Arc::new(HealthState::default());
    health::watch_workers(health_state.clone(), worker_handles.fatal_errors);

    let router = Router {
        gateway,
        health: health_state,
    };

    let grpc_router =
        tonic::transport::Server::builder().add_routes(tonic::service::Routes::default());

    let launch_settings = LaunchSettings {
        service_name: SERVICE_NAME.to_string(),
        server: settings.server,
        metrics: settings.metrics,
        graceful_shutdown: Default::default(),
    };

    let result = launcher::launch(launch_settings, router, grpc_router).await;
    shutdown.cancel();
    result
}
