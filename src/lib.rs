//! vipwatch -- VIP social-media threat monitoring daemon.
//!
//! This crate provides the threat analysis pipeline (detector bank,
//! semantic assessor, fusion), the monitoring controller that drives it on
//! a fixed scan interval, the SQLite alert store, and the dashboard API.

pub mod analysis;
pub mod api;
pub mod assess;
pub mod config;
pub mod detect;
pub mod monitor;
pub mod source;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::ThreatPipeline;
use crate::api::state::AppState;
use crate::assess::{DisabledAssessor, RemoteAssessor, SemanticAssessor};
use crate::config::Config;
use crate::detect::DetectorBank;
use crate::monitor::MonitorController;
use crate::source::mock::MockFeed;
use crate::source::PostSource;
use crate::storage::AlertStore;

/// Build the semantic assessor selected by configuration. With no endpoint
/// configured the pipeline runs detector-only.
pub fn build_assessor(cfg: &config::AssessorConfig) -> Result<Arc<dyn SemanticAssessor>> {
    if !cfg.enabled || cfg.endpoint.is_empty() {
        return Ok(Arc::new(DisabledAssessor));
    }
    let api_key = std::env::var(&cfg.api_key_env).ok();
    let assessor = RemoteAssessor::new(&cfg.endpoint, api_key, cfg.timeout_secs)
        .context("failed to build remote assessor")?;
    Ok(Arc::new(assessor))
}

/// Assemble the per-post analysis pipeline from configuration.
pub fn build_pipeline(config: &Config) -> Result<Arc<ThreatPipeline>> {
    let bank = DetectorBank::standard(config.monitoring.official_image_refs.clone());
    let assessor = build_assessor(&config.assessor)?;
    Ok(Arc::new(ThreatPipeline::new(
        bank,
        assessor,
        config.scoring.to_policy(),
    )))
}

/// Start the vipwatch daemon: alert store, monitoring controller, API server.
pub async fn serve(config: Config) -> Result<()> {
    tracing::info!(db_path = %config.storage.db_path, "Initializing database");
    let pool = storage::open_pool(&config.storage.db_path)?;
    let store = AlertStore::new(pool);

    let pipeline = build_pipeline(&config)?;
    let source: Arc<dyn PostSource> = Arc::new(MockFeed::new(
        &config.monitoring.vip_name,
        &config.monitoring.vip_handle,
    ));

    let controller = MonitorController::new(
        store.clone(),
        pipeline.clone(),
        source,
        config.monitoring.platforms.clone(),
        Duration::from_secs(config.monitoring.interval_secs),
        config.monitoring.batch_size,
    )?;

    // Monitoring is live from boot; the dashboard can stop and restart it.
    controller.start();

    let state = AppState {
        controller,
        store,
        pipeline,
    };
    let app = api::router(state);

    let addr: std::net::SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", config.server.bind))?;
    tracing::info!(%addr, "vipwatch listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
