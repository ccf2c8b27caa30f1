//! Configuration module
//!
//! This module provides configuration structures for the webhook receiver:
//! server settings, the uploads root, and the multipart/JSON body limits.

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_MAX_FIELD_SIZE_KB, DEFAULT_MAX_FILES, DEFAULT_MAX_FILE_SIZE_MB,
    DEFAULT_MAX_JSON_BODY_MB, DEFAULT_METADATA_FIELD_NAMES, DEFAULT_UPLOADS_DIR,
};
use crate::log_format::LogFormat;

const SERVER_PORT: u16 = 3000;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: LogFormat,
    /// Per-request timeout in seconds. 0 = disabled.
    pub request_timeout_secs: u64,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            log_format: LogFormat::default(),
            request_timeout_secs: 0,
        }
    }
}

/// Webhook receiver configuration
#[derive(Clone, Debug)]
pub struct WebhookConfig {
    pub base: BaseConfig,
    pub uploads_dir: PathBuf,
    pub max_files: usize,
    pub max_file_size_bytes: usize,
    pub max_field_size_bytes: usize,
    pub max_json_body_bytes: usize,
    /// Form field names that are tried as JSON metadata before any other field
    pub metadata_field_names: Vec<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            max_files: DEFAULT_MAX_FILES,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            max_field_size_bytes: DEFAULT_MAX_FIELD_SIZE_KB * 1024,
            max_json_body_bytes: DEFAULT_MAX_JSON_BODY_MB * 1024 * 1024,
            metadata_field_names: DEFAULT_METADATA_FIELD_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub Box<WebhookConfig>);

impl Config {
    fn as_webhook(&self) -> &WebhookConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_webhook().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = WebhookConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_webhook().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_webhook().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_webhook().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_webhook().base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_webhook().base.log_format
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.as_webhook().base.request_timeout_secs
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.as_webhook().uploads_dir
    }

    pub fn max_files(&self) -> usize {
        self.as_webhook().max_files
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.as_webhook().max_file_size_bytes
    }

    pub fn max_field_size_bytes(&self) -> usize {
        self.as_webhook().max_field_size_bytes
    }

    pub fn max_json_body_bytes(&self) -> usize {
        self.as_webhook().max_json_body_bytes
    }

    pub fn metadata_field_names(&self) -> &[String] {
        &self.as_webhook().metadata_field_names
    }

    /// Upper bound for a whole request body, whichever path it takes.
    /// Multipart framing and text fields get a fixed 16 MB allowance on top of the files.
    pub fn max_request_body_bytes(&self) -> usize {
        const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024 * 1024;
        let multipart = self
            .max_files()
            .saturating_mul(self.max_file_size_bytes())
            .saturating_add(MULTIPART_OVERHEAD_BYTES);
        multipart.max(self.max_json_body_bytes())
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl WebhookConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset or unparsable
    /// values fall back to their defaults; `PORT` must parse when present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let cors_origins = parse_list(&lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string()));

        let log_format = lookup("LOG_FORMAT")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
            log_format,
            request_timeout_secs: parse_or(lookup("REQUEST_TIMEOUT_SECS"), 0),
        };

        let uploads_dir = lookup("UPLOADS_DIR")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPLOADS_DIR.to_string());

        let metadata_field_names = lookup("METADATA_FIELD_NAMES")
            .map(|s| parse_list(&s))
            .filter(|names| !names.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_METADATA_FIELD_NAMES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        let config = WebhookConfig {
            base,
            uploads_dir: PathBuf::from(uploads_dir),
            max_files: parse_or(lookup("MAX_FILES_PER_REQUEST"), DEFAULT_MAX_FILES),
            max_file_size_bytes: parse_or(lookup("MAX_FILE_SIZE_MB"), DEFAULT_MAX_FILE_SIZE_MB)
                .saturating_mul(1024 * 1024),
            max_field_size_bytes: parse_or(lookup("MAX_FIELD_SIZE_KB"), DEFAULT_MAX_FIELD_SIZE_KB)
                .saturating_mul(1024),
            max_json_body_bytes: parse_or(lookup("MAX_JSON_BODY_MB"), DEFAULT_MAX_JSON_BODY_MB)
                .saturating_mul(1024 * 1024),
            metadata_field_names,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if is_production_env(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.uploads_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("UPLOADS_DIR must not be empty"));
        }

        if self.max_files == 0 {
            return Err(anyhow::anyhow!(
                "MAX_FILES_PER_REQUEST must be greater than zero"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.max_json_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_JSON_BODY_MB must be greater than zero"));
        }

        if self.metadata_field_names.is_empty() {
            return Err(anyhow::anyhow!(
                "METADATA_FIELD_NAMES must name at least one field"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = WebhookConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base.server_port, 3000);
        assert_eq!(config.max_files, 50);
        assert_eq!(config.max_file_size_bytes, 20 * 1024 * 1024);
        assert_eq!(config.max_field_size_bytes, 1024 * 1024);
        assert_eq!(config.max_json_body_bytes, 100 * 1024 * 1024);
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(
            config.metadata_field_names,
            vec!["json", "data", "metadata", "result"]
        );
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = WebhookConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("UPLOADS_DIR", "/var/lib/hookdrop"),
            ("MAX_FILES_PER_REQUEST", "3"),
            ("MAX_FILE_SIZE_MB", "1"),
            ("METADATA_FIELD_NAMES", "payload, result"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.base.server_port, 8080);
        assert_eq!(config.uploads_dir, PathBuf::from("/var/lib/hookdrop"));
        assert_eq!(config.max_files, 3);
        assert_eq!(config.max_file_size_bytes, 1024 * 1024);
        assert_eq!(config.metadata_field_names, vec!["payload", "result"]);
        assert_eq!(config.base.log_format, LogFormat::Json);
    }

    #[test]
    fn test_unparsable_limits_fall_back_to_defaults() {
        let config =
            WebhookConfig::from_lookup(lookup_from(&[("MAX_FILES_PER_REQUEST", "lots")])).unwrap();
        assert_eq!(config.max_files, 50);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = WebhookConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_file_limit_is_rejected() {
        let result = WebhookConfig::from_lookup(lookup_from(&[("MAX_FILES_PER_REQUEST", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let result = WebhookConfig::from_lookup(lookup_from(&[("ENVIRONMENT", "production")]));
        assert!(result.is_err());

        let config = WebhookConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("CORS_ORIGINS", "https://hooks.example.com"),
        ]))
        .unwrap();
        assert!(Config(Box::new(config)).is_production());
    }

    #[test]
    fn test_max_request_body_covers_both_paths() {
        let config = Config::default();
        assert!(config.max_request_body_bytes() >= config.max_json_body_bytes());
        assert!(
            config.max_request_body_bytes()
                >= config.max_files() * config.max_file_size_bytes()
        );
    }
}
