use std::env;
use std::fs;
use std::path::Path;

use shopassist_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let sources = SourceLookup {
        file_doc: load_config_file_doc(config_file_path.as_deref()),
        file_path: config_file_path.as_deref(),
    };

    let vocabulary = config
        .matching
        .vocabulary
        .iter()
        .map(|entry| entry.kind.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let entries = [
        (
            "catalog.artifact_path",
            config.catalog.artifact_path.display().to_string(),
            &["SHOPASSIST_CATALOG_ARTIFACT_PATH"][..],
        ),
        (
            "matching.max_recommendations",
            config.matching.max_recommendations.to_string(),
            &["SHOPASSIST_MATCHING_MAX_RECOMMENDATIONS"][..],
        ),
        (
            "matching.max_listed",
            config.matching.max_listed.to_string(),
            &["SHOPASSIST_MATCHING_MAX_LISTED"][..],
        ),
        (
            "matching.default_category",
            config.matching.default_category.clone(),
            &["SHOPASSIST_MATCHING_DEFAULT_CATEGORY"][..],
        ),
        ("matching.vocabulary", format!("[{vocabulary}]"), &[][..]),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["SHOPASSIST_SERVER_BIND_ADDRESS"][..],
        ),
        ("server.port", config.server.port.to_string(), &["SHOPASSIST_SERVER_PORT"][..]),
        (
            "logging.level",
            config.logging.level.clone(),
            &["SHOPASSIST_LOGGING_LEVEL", "SHOPASSIST_LOG_LEVEL"][..],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["SHOPASSIST_LOGGING_FORMAT", "SHOPASSIST_LOG_FORMAT"][..],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in entries {
        lines.push(render_line(key, &value, sources.field_source(key, env_keys)));
    }

    lines.join("\n")
}

struct SourceLookup<'a> {
    file_doc: Option<Value>,
    file_path: Option<&'a Path>,
}

impl SourceLookup<'_> {
    fn field_source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.file_doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .file_path
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
