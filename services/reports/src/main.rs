use std::sync::Arc;
use std::time::Duration;

use sea_orm::Database;
use tokio::sync::mpsc;
use tracing::info;

use classnote_core::config::Config as _;
use classnote_core::tracing::init_tracing;
use classnote_reports::config::ReportsConfig;
use classnote_reports::infra::db::DbSubscriberResolver;
use classnote_reports::infra::fcm::FcmClient;
use classnote_reports::router::build_router;
use classnote_reports::state::AppState;
use classnote_reports::usecase::dispatch::PushDispatcher;
use classnote_reports::usecase::fanout::{FanoutWorker, NotifySubscribersUseCase};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ReportsConfig::from_env().expect("invalid reports configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let fcm = FcmClient::new(
        &config.fcm_base_url,
        &config.fcm_project_id,
        config.fcm_access_token.clone(),
        Duration::from_secs(config.fcm_timeout_secs),
        config.fcm_concurrency,
    )
    .expect("failed to build FCM client");

    // Fan-out runs on its own task; it stops once every sender is dropped.
    let (events, receiver) = mpsc::channel(config.event_buffer.max(1));
    let worker = FanoutWorker {
        usecase: Arc::new(NotifySubscribersUseCase {
            subscribers: DbSubscriberResolver { db: db.clone() },
            dispatcher: PushDispatcher { provider: fcm },
            locale: config.notify_locale,
        }),
        concurrency: config.fanout_concurrency,
    };
    let worker_handle = tokio::spawn(worker.run(receiver));

    let router = build_router(AppState { db, events });
    let addr = format!("0.0.0.0:{}", config.reports_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("reports service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // The router, and with it the last sender, is gone; let queued fan-outs finish.
    info!("http server stopped, draining fan-out queue");
    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "fan-out worker panicked");
    }
    info!("reports service stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
