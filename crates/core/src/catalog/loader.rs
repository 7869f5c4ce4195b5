use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::artifact::CatalogArtifact;
use super::CatalogStore;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("could not read catalog artifact `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog artifact `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CatalogHealth {
    Healthy { item_count: usize },
    Degraded { reason: String },
}

impl CatalogHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

/// Result of the one-shot startup load. A degraded load still carries a
/// usable (empty) store so the handlers keep answering.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub store: CatalogStore,
    pub health: CatalogHealth,
}

impl CatalogStore {
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogLoadError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_json(&raw)
            .map_err(|source| CatalogLoadError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let artifact: CatalogArtifact = serde_json::from_str(raw)?;
        Ok(Self::from_parts(artifact.item_info.0, artifact.recommender, artifact.category_keywords))
    }

    pub fn load_or_degraded(path: &Path) -> LoadedCatalog {
        match Self::load(path) {
            Ok(store) => {
                info!(
                    event_name = "catalog.load.succeeded",
                    path = %path.display(),
                    item_count = store.len(),
                    "loaded catalog artifact with {} products",
                    store.len()
                );
                let health = CatalogHealth::Healthy { item_count: store.len() };
                LoadedCatalog { store, health }
            }
            Err(error) => {
                warn!(
                    event_name = "catalog.load.failed",
                    path = %path.display(),
                    error = %error,
                    "failed to load catalog artifact; serving with an empty catalog"
                );
                LoadedCatalog {
                    store: CatalogStore::empty(),
                    health: CatalogHealth::Degraded { reason: error.to_string() },
                }
            }
        }
    }
}
