use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::DEFAULT_CATEGORY;
use crate::vocabulary::{default_vocabulary, TypeVocabulary};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub matching: MatchingConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub artifact_path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchingConfig {
    pub max_recommendations: usize,
    pub max_listed: usize,
    pub default_category: String,
    pub vocabulary: Vec<TypeVocabulary>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub artifact_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub server_port: Option<u16>,
    pub max_recommendations: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 2,
            max_listed: 5,
            default_category: DEFAULT_CATEGORY.to_string(),
            vocabulary: default_vocabulary(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig { artifact_path: PathBuf::from("ml_model/recommender.json") },
            matching: MatchingConfig::default(),
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 5055,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("shopassist.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(artifact_path) = catalog.artifact_path {
                self.catalog.artifact_path = artifact_path;
            }
        }

        if let Some(matching) = patch.matching {
            if let Some(max_recommendations) = matching.max_recommendations {
                self.matching.max_recommendations = max_recommendations;
            }
            if let Some(max_listed) = matching.max_listed {
                self.matching.max_listed = max_listed;
            }
            if let Some(default_category) = matching.default_category {
                self.matching.default_category = default_category;
            }
            if let Some(vocabulary) = matching.vocabulary {
                self.matching.vocabulary =
                    vocabulary.into_iter().map(normalize_vocabulary).collect();
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHOPASSIST_CATALOG_ARTIFACT_PATH") {
            self.catalog.artifact_path = PathBuf::from(value);
        }

        if let Some(value) = read_env("SHOPASSIST_MATCHING_MAX_RECOMMENDATIONS") {
            self.matching.max_recommendations =
                parse_usize("SHOPASSIST_MATCHING_MAX_RECOMMENDATIONS", &value)?;
        }
        if let Some(value) = read_env("SHOPASSIST_MATCHING_MAX_LISTED") {
            self.matching.max_listed = parse_usize("SHOPASSIST_MATCHING_MAX_LISTED", &value)?;
        }
        if let Some(value) = read_env("SHOPASSIST_MATCHING_DEFAULT_CATEGORY") {
            self.matching.default_category = value;
        }

        if let Some(value) = read_env("SHOPASSIST_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SHOPASSIST_SERVER_PORT") {
            self.server.port = parse_u16("SHOPASSIST_SERVER_PORT", &value)?;
        }

        let log_level =
            read_env("SHOPASSIST_LOGGING_LEVEL").or_else(|| read_env("SHOPASSIST_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHOPASSIST_LOGGING_FORMAT").or_else(|| read_env("SHOPASSIST_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(artifact_path) = overrides.artifact_path {
            self.catalog.artifact_path = artifact_path;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(max_recommendations) = overrides.max_recommendations {
            self.matching.max_recommendations = max_recommendations;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_matching(&self.matching)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shopassist.toml"), PathBuf::from("config/shopassist.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn normalize_vocabulary(entry: TypeVocabulary) -> TypeVocabulary {
    let lower = |terms: Vec<String>| -> Vec<String> {
        terms.into_iter().map(|term| term.trim().to_lowercase()).collect()
    };
    TypeVocabulary {
        kind: entry.kind.trim().to_string(),
        plural: entry.plural.trim().to_string(),
        detect: lower(entry.detect),
        name_markers: lower(entry.name_markers),
    }
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.artifact_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "catalog.artifact_path must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_matching(matching: &MatchingConfig) -> Result<(), ConfigError> {
    if matching.max_listed == 0 {
        return Err(ConfigError::Validation(
            "matching.max_listed must be greater than zero".to_string(),
        ));
    }

    if matching.default_category.trim().is_empty() {
        return Err(ConfigError::Validation(
            "matching.default_category must not be empty".to_string(),
        ));
    }

    for entry in &matching.vocabulary {
        if entry.kind.is_empty() || entry.plural.is_empty() {
            return Err(ConfigError::Validation(
                "matching.vocabulary entries need both `kind` and `plural`".to_string(),
            ));
        }
        let has_blank = entry.detect.iter().chain(&entry.name_markers).any(|term| term.is_empty());
        if entry.detect.is_empty() || entry.name_markers.is_empty() || has_blank {
            return Err(ConfigError::Validation(format!(
                "matching.vocabulary `{}` needs non-empty `detect` and `name_markers` terms",
                entry.kind
            )));
        }
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation(
            "server.bind_address must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    matching: Option<MatchingPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    artifact_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingPatch {
    max_recommendations: Option<usize>,
    max_listed: Option<usize>,
    default_category: Option<String>,
    vocabulary: Option<Vec<TypeVocabulary>>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
