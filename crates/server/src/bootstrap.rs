use std::sync::Arc;

use shopassist_agent::AgentRuntime;
use shopassist_core::config::AppConfig;
use shopassist_core::{CatalogHealth, CatalogStore};
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub runtime: Arc<AgentRuntime>,
    pub catalog_health: CatalogHealth,
}

/// A catalog that fails to load leaves the server running on an empty store;
/// the failure is surfaced through `catalog_health` and `/health`.
pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        artifact_path = %config.catalog.artifact_path.display(),
        "starting application bootstrap"
    );

    let loaded = CatalogStore::load_or_degraded(&config.catalog.artifact_path);
    let runtime = AgentRuntime::new(Arc::new(loaded.store), config.matching.clone());

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        catalog_healthy = loaded.health.is_healthy(),
        actions = runtime.registry().len(),
        "application bootstrap complete"
    );

    Application { config, runtime: Arc::new(runtime), catalog_health: loaded.health }
}
