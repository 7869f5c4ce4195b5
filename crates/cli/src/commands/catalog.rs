use serde::Serialize;
use shopassist_core::config::{AppConfig, LoadOptions};
use shopassist_core::{CatalogHealth, CatalogStore};

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CatalogReport {
    artifact_path: String,
    health: CatalogHealth,
    recommendation_sources: usize,
    categories: usize,
}

pub fn run(json_output: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("catalog", "config_validation", error.to_string(), 2)
        }
    };

    let loaded = CatalogStore::load_or_degraded(&config.catalog.artifact_path);
    let report = CatalogReport {
        artifact_path: config.catalog.artifact_path.display().to_string(),
        recommendation_sources: loaded
            .store
            .products()
            .iter()
            .filter(|product| !loaded.store.recommendations(&product.id).is_empty())
            .count(),
        categories: loaded.store.category_keywords().len(),
        health: loaded.health,
    };
    let exit_code = if report.health.is_healthy() { 0 } else { 4 };

    if json_output {
        return match serde_json::to_string_pretty(&report) {
            Ok(output) => CommandResult { exit_code, output },
            Err(error) => CommandResult::failure("catalog", "serialization", error.to_string(), 1),
        };
    }

    let output = match &report.health {
        CatalogHealth::Healthy { item_count } => format!(
            "catalog `{}`: {item_count} products, {} with recommendations, {} keyword categories",
            report.artifact_path, report.recommendation_sources, report.categories
        ),
        CatalogHealth::Degraded { reason } => {
            format!("catalog `{}` degraded: {reason}", report.artifact_path)
        }
    };
    CommandResult { exit_code, output }
}
