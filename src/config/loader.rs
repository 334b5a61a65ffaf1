//! Configuration loading from disk and the environment.

use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::BoardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key} ({value:?}): {reason}")]
    InvalidEnv {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then `.env`
/// and process environment variables. The result is validated.
pub fn load(path: Option<&Path>) -> Result<BoardConfig, ConfigError> {
    if let Ok(env_file) = dotenvy::dotenv() {
        tracing::debug!(path = %env_file.display(), "Loaded .env file");
    }

    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => BoardConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<BoardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: BoardConfig = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "Read configuration file");
    Ok(config)
}

/// Overlay environment-style settings on `config`.
///
/// `lookup` returns the raw value of a variable, if set. Empty values are
/// treated as unset.
pub fn apply_env_overrides<F>(config: &mut BoardConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("MONGODB_URI") {
        config.store.uri = v;
    }
    if let Some(v) = get("MONGODB_DB") {
        config.store.database = v;
    }
    if let Some(v) = get("MONGODB_COLLECTION") {
        config.store.collection = v;
    }
    if let Some(v) = get("STORE_BACKEND") {
        config.store.backend = parse("STORE_BACKEND", v)?;
    }
    if let Some(v) = get("MONGODB_SERVER_SELECTION_TIMEOUT_MS") {
        config.store.server_selection_timeout_ms = parse("MONGODB_SERVER_SELECTION_TIMEOUT_MS", v)?;
    }
    if let Some(v) = get("HOST") {
        config.listener.host = v;
    }
    if let Some(v) = get("PORT") {
        config.listener.port = parse("PORT", v)?;
    }
    if let Some(v) = get("MONGODB_CONNECT_RETRIES") {
        config.retry.max_attempts = parse("MONGODB_CONNECT_RETRIES", v)?;
    }
    if let Some(v) = get("MONGODB_CONNECT_RETRY_DELAY_MS") {
        config.retry.delay_ms = parse("MONGODB_CONNECT_RETRY_DELAY_MS", v)?;
    }
    if let Some(v) = get("MONGODB_CONNECT_BACKOFF") {
        config.retry.backoff = parse("MONGODB_CONNECT_BACKOFF", v)?;
    }
    if let Some(v) = get("SERVE_STATIC") {
        config.frontend.serve_static = parse_bool("SERVE_STATIC", v)?;
    }
    if let Some(v) = get("STATIC_DIR") {
        config.frontend.static_dir = v;
    }
    if let Some(v) = get("DROP_DB_ON_CLOSE") {
        config.lifecycle.wipe_on_close = parse_bool("DROP_DB_ON_CLOSE", v)?;
    }
    if let Some(v) = get("SHUTDOWN_TIMEOUT_SECS") {
        config.lifecycle.shutdown_timeout_secs = parse("SHUTDOWN_TIMEOUT_SECS", v)?;
    }
    if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
        config.limits.request_timeout_secs = parse("REQUEST_TIMEOUT_SECS", v)?;
    }
    if let Some(v) = get("MAX_BODY_BYTES") {
        config.limits.max_body_bytes = parse("MAX_BODY_BYTES", v)?;
    }
    if let Some(v) = get("LOG_LEVEL") {
        config.observability.log_level = v;
    }
    if let Some(v) = get("LOG_FORMAT") {
        config.observability.log_format = parse("LOG_FORMAT", v)?;
    }

    Ok(())
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        key,
        reason: e.to_string(),
        value,
    })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, StoreBackend};
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BoardConfig::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                ("MONGODB_URI", "mongodb://mongo:27017"),
                ("MONGODB_DB", "board"),
                ("MONGODB_COLLECTION", "messages"),
                ("PORT", "8080"),
                ("MONGODB_CONNECT_RETRIES", "3"),
                ("MONGODB_CONNECT_RETRY_DELAY_MS", "50"),
                ("SERVE_STATIC", "false"),
                ("DROP_DB_ON_CLOSE", "1"),
                ("LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.store.uri, "mongodb://mongo:27017");
        assert_eq!(config.store.database, "board");
        assert_eq!(config.store.collection, "messages");
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_ms, 50);
        assert!(!config.frontend.serve_static);
        assert!(config.lifecycle.wipe_on_close);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = BoardConfig::default();
        apply_env_overrides(&mut config, lookup(&[("PORT", ""), ("STORE_BACKEND", "  ")])).unwrap();
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.store.backend, StoreBackend::Mongodb);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = BoardConfig::default();
        let err = apply_env_overrides(&mut config, lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "PORT", .. }));
    }

    #[test]
    fn test_invalid_bool() {
        let mut config = BoardConfig::default();
        let err = apply_env_overrides(&mut config, lookup(&[("SERVE_STATIC", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("SERVE_STATIC"));
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [store]
            backend = "memory"

            [listener]
            port = 0
            "#
        )
        .unwrap();

        let config = read_config_file(file.path()).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.listener.port, 0);
    }

    #[test]
    fn test_load_config_file_reports_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[retry]\nmax_attempts = 0").unwrap();

        let config = read_config_file(file.path()).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
