//! Tracing setup and the Prometheus metrics endpoint.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub fn init_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(
        "reading_service=info"
            .parse()
            .unwrap_or_else(|_| "info".parse().expect("static directive parses")),
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Installs the Prometheus recorder and serves `/metrics` on `bind_addr` in a
/// background task. Call at most once, after the runtime is up.
pub fn init_metrics(bind_addr: &str) {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus metrics recorder");
    let _ = PROM_HANDLE.set(handle);

    let addr: SocketAddr = bind_addr.parse().expect("invalid metrics bind address");

    tokio::spawn(async move {
        let app = Router::new().route("/metrics", get(render_metrics));
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    tracing::error!(error = %e, "metrics server error");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to bind metrics listener");
            }
        }
    });
}

async fn render_metrics() -> String {
    PROM_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_default()
}
