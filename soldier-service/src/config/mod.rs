use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct SoldierConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl SoldierConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env and the APP__ prefix
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the config from `common` plus the variables answered by `lookup`.
    pub fn from_lookup(
        common: core_config::Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";
        let get_env = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        let log_level = get_env("LOG_LEVEL", Some(&common.log_level))?;

        Ok(SoldierConfig {
            common: core_config::Config {
                log_level,
                ..common
            },
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"))?,
                database: get_env("MONGODB_DATABASE", Some("chivalry"))?,
            },
            store: StoreConfig {
                backend: get_env("STORE_BACKEND", Some("mongo"))?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            },
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.is_empty()),
        })
    }

    /// Config for an in-process instance: in-memory store, OS-assigned port.
    pub fn in_memory() -> Self {
        SoldierConfig {
            common: core_config::Config {
                port: 0,
                ..core_config::Config::default()
            },
            mongodb: MongoConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: "chivalry".to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
            },
            otlp_endpoint: None,
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

fn get_env(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError> {
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<SoldierConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SoldierConfig::from_lookup(core_config::Config::default(), |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_outside_prod() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.common.log_level, "info");
        assert_eq!(config.mongodb.uri, "mongodb://localhost:27017");
        assert_eq!(config.mongodb.database, "chivalry");
        assert_eq!(config.store.backend, StoreBackend::Mongo);
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn reads_log_level_and_backend_from_env() {
        let config = load_with(&[
            ("LOG_LEVEL", "debug"),
            ("STORE_BACKEND", "memory"),
            ("OTLP_ENDPOINT", "http://tempo:4317"),
        ])
        .unwrap();

        assert_eq!(config.common.log_level, "debug");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://tempo:4317"));
    }

    #[test]
    fn prod_requires_every_variable() {
        let err = load_with(&[("ENVIRONMENT", "prod")]).unwrap_err();

        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("required in production"));
    }

    #[test]
    fn prod_accepts_fully_specified_env() {
        let config = load_with(&[
            ("ENVIRONMENT", "prod"),
            ("LOG_LEVEL", "warn"),
            ("MONGODB_URI", "mongodb://mongo:27017"),
            ("MONGODB_DATABASE", "army"),
            ("STORE_BACKEND", "mongo"),
        ])
        .unwrap();

        assert_eq!(config.common.log_level, "warn");
        assert_eq!(config.mongodb.database, "army");
    }

    #[test]
    fn invalid_store_backend_is_a_config_error() {
        let err = load_with(&[("STORE_BACKEND", "redis")]).unwrap_err();

        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("Invalid store backend: redis"));
    }

    #[test]
    fn parses_store_backend_case_insensitively() {
        assert_eq!("Mongo".parse::<StoreBackend>(), Ok(StoreBackend::Mongo));
        assert_eq!("mongodb".parse::<StoreBackend>(), Ok(StoreBackend::Mongo));
        assert_eq!("MEMORY".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn in_memory_config_binds_ephemeral_port() {
        let config = SoldierConfig::in_memory();
        assert_eq!(config.common.port, 0);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.otlp_endpoint.is_none());
    }
}
