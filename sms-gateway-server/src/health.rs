use actix_web::{web, HttpResponse};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::mpsc;

/// Liveness flag flipped by the first fatal worker error and never reset.
pub struct HealthState {
    healthy: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            healthy: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    pub fn healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn mark_unhealthy(&self) {
        self.healthy.store(false, Ordering::Relaxed);
    }
}

/// Subscribes the liveness flag to the workers' fatal-error channel.
pub fn watch_workers(
    state: Arc<HealthState>,
    mut fatal_errors: mpsc::UnboundedReceiver<anyhow::Error>,
) {
    tokio::spawn(async move {
        while let Some(err) = fatal_errors.recv().await {
            tracing::error!(error = %err, "fatal worker error, marking service unhealthy");
            state.mark_unhealthy();
        }
    });
}

pub async fn healthz(health: web::Data<HealthState>) -> HttpResponse {
    if health.healthy() {
        HttpResponse::Ok().body("healthy\n")
    } else {
        HttpResponse::ServiceUnavailable().body("unhealthy\n")
    }
}
