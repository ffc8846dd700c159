use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use catalog::Catalog;
use service::{file::counter_store::FileCounterStore, registration::RegistrationService, runtime};

use crate::keepalive;
use crate::routes::{self, ServerState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &configs::AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Directory holding the counter file, for the startup existence check.
fn data_dir(counters_path: &str) -> String {
    std::path::Path::new(counters_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;
    if cfg.admin.is_dev_key() {
        warn!("admin key is the development default; set ADMIN_KEY before exposing this service");
    }

    runtime::ensure_env(&data_dir(&cfg.storage.counters_path)).await?;

    let catalog = Arc::new(Catalog::from_entries(&cfg.programs)?);
    let counters = FileCounterStore::new(cfg.storage.counters_path.clone()).await?;
    let service = Arc::new(RegistrationService::new(catalog, counters, cfg.admin.key.clone()));

    // Every cataloged program gets an explicit persisted entry up front.
    service.initialize().await?;

    keepalive::spawn(cfg.keepalive.clone());

    let state = ServerState { service };
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, programs = cfg.programs.len(), "starting registry server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
