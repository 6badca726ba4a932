use std::sync::Arc;

use anyhow::Result;
use reading_service::config::AppConfig;
use reading_service::http::{self, AppState};
use reading_service::notify::LogAlertDispatcher;
use reading_service::observability;
use reading_service::store::MemoryProfileStore;
use reading_service::SubmissionService;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        observability::init_metrics(&metrics_cfg.bind_addr);
    }

    let store = Arc::new(MemoryProfileStore::new());
    let dispatcher = Arc::new(LogAlertDispatcher);
    let service = Arc::new(SubmissionService::new(
        store.clone(),
        dispatcher,
        cfg.defaults.water_goal_liters,
    ));

    let state = AppState {
        service,
        store,
    };
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.http.bind_addr).await?;
    tracing::info!(addr = %cfg.http.bind_addr, "reading service listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
