use std::{net::SocketAddr, sync::Arc};

use tracing::info;

use atelier_api as api;
use atelier_api::notifications::{LogNotifier, LowStockNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);

    let db = api::db::connect(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db).await?;
    }
    let db = Arc::new(db);

    let (event_sender, event_rx) = api::events::channel(1024);
    let notifier: Arc<dyn LowStockNotifier> = Arc::new(LogNotifier);
    tokio::spawn(api::events::process_events(event_rx, notifier));

    let services = api::AppServices::new(db.clone(), event_sender.clone(), &cfg);
    let state = api::AppState {
        db,
        config: cfg.clone(),
        event_sender,
        services,
    };

    let app = api::app_router(state);
    let addr: SocketAddr = cfg.bind_addr().parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, stopping server");
}
