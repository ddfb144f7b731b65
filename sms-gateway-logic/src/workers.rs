use crate::{error::ServiceError, services::SmsGateway, settings::GatewaySettings};
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;

pub struct WorkerHandles {
    /// Receives the error that made a worker exit; once anything arrives
    /// here the service should report itself unhealthy.
    pub fatal_errors: mpsc::UnboundedReceiver<anyhow::Error>,
    pub handles: Vec<JoinHandle<()>>,
}

/// Launches the background pipeline: one enqueue worker and a fixed pool of
/// send workers. All of them stop cleanly when `shutdown` is cancelled.
pub fn start(gateway: Arc<SmsGateway>, shutdown: CancellationToken) -> WorkerHandles {
    let settings = gateway.settings().clone();
    let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();

    let mut handles = Vec::with_capacity(settings.send_worker_count + 1);
    handles.push(tokio::spawn(enqueue_worker(
        gateway.clone(),
        settings.clone(),
        shutdown.clone(),
        fatal_tx.clone(),
    )));
    for worker in 0..settings.send_worker_count {
        handles.push(tokio::spawn(send_worker(
            worker,
            gateway.clone(),
            shutdown.clone(),
            fatal_tx.clone(),
        )));
    }

    WorkerHandles {
        fatal_errors: fatal_rx,
        handles,
    }
}

async fn enqueue_worker(
    gateway: Arc<SmsGateway>,
    settings: GatewaySettings,
    shutdown: CancellationToken,
    fatal: mpsc::UnboundedSender<anyhow::Error>,
) {
    loop {
        if shutdown.is_cancelled() {
            tracing::info!("enqueue worker is shutting down");
            return;
        }

        match gateway.enqueue_once().await {
            Ok(0) => {
                // Nothing scheduled right now.
                idle(&shutdown, settings.empty_enqueue_sleep).await;
            }
            Ok(moved) => {
                tracing::debug!(moved, "enqueued messages");
            }
            Err(ServiceError::NoCapacity) => {
                // Saturated; wait for the send workers to drain.
                idle(&shutdown, settings.full_capacity_sleep).await;
            }
            Err(err) if err.is_fatal() => {
                tracing::error!(error = %err, "enqueue worker is shutting down");
                let _ = fatal.send(err.into());
                return;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to enqueue messages");
            }
        }
    }
}

async fn send_worker(
    worker: usize,
    gateway: Arc<SmsGateway>,
    shutdown: CancellationToken,
    fatal: mpsc::UnboundedSender<anyhow::Error>,
) {
    loop {
        if shutdown.is_cancelled() {
            tracing::info!(worker, "send worker is shutting down");
            return;
        }

        match gateway.send_once().await {
            Ok(()) => {}
            // An idle pop window or a message finalized elsewhere; both are
            // expected under normal operation.
            Err(ServiceError::Queue(crate::queue::QueueError::Empty))
            | Err(ServiceError::MessageNotFound) => {}
            Err(err) if err.is_fatal() => {
                tracing::error!(worker, error = %err, "send worker is shutting down");
                let _ = fatal.send(err.into());
                return;
            }
            Err(err) => {
                tracing::error!(worker, error = %err, "failed to send message from queue");
            }
        }
    }
}

async fn idle(shutdown: &CancellationToken, duration: Duration) {
    tokio::select! {
        _ = shutdown.cancelled() => {}
        _ = sleep(duration) => {}
    }
}
