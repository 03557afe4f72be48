use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::StorageBackend;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub storage: FileStorageConfig,
    #[serde(default)]
    pub translation: FileTranslationConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_headers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_ttl_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_pepper: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<StorageBackend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upload_bytes: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileTranslationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_url_file: Option<PathBuf>,
    pub database_host: Option<String>,
    pub database_port: Option<u16>,
    pub database_user: Option<String>,
    pub database_name: Option<String>,
    pub database_password: Option<String>,
    pub database_password_file: Option<PathBuf>,
    pub database_max_connections: Option<u32>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub cors_allowed_methods: Option<Vec<String>>,
    pub cors_allowed_headers: Option<Vec<String>>,
    pub cors_allow_credentials: Option<bool>,
    pub jwt_secret: Option<String>,
    pub token_ttl_secs: Option<u64>,
    pub password_pepper: Option<String>,
    pub storage_backend: Option<String>,
    pub storage_local_root: Option<PathBuf>,
    pub storage_public_base_url: Option<String>,
    pub storage_endpoint: Option<String>,
    pub storage_bucket: Option<String>,
    pub storage_api_key: Option<String>,
    pub max_upload_bytes: Option<usize>,
    pub translation_enabled: Option<bool>,
    pub llm_endpoint: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub llm_timeout_secs: Option<u64>,
    pub llm_temperature: Option<f32>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; `gather` uses the process env.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name).filter(|value| !value.trim().is_empty())
        };
        let path = |name: &str| var(name).map(PathBuf::from);
        let csv = |name: &str| var(name).map(|raw| split_csv(&raw));
        let flag = |name: &str| var(name).and_then(|raw| parse_bool(&raw));

        Self {
            config_path: path("ARENA_CONFIG_PATH"),
            server_host: var("SERVER_HOST"),
            server_port: parsed(var("SERVER_PORT")),
            database_url: var("DATABASE_URL"),
            database_url_file: path("DATABASE_URL_FILE"),
            database_host: var("DATABASE_HOST"),
            database_port: parsed(var("DATABASE_PORT")),
            database_user: var("DATABASE_USER"),
            database_name: var("DATABASE_NAME"),
            database_password: var("DATABASE_PASSWORD"),
            database_password_file: path("DATABASE_PASSWORD_FILE"),
            database_max_connections: parsed(var("DB_MAX_CONNECTIONS")),
            cors_allowed_origins: csv("CORS_ALLOWED_ORIGINS"),
            cors_allowed_methods: csv("CORS_ALLOWED_METHODS"),
            cors_allowed_headers: csv("CORS_ALLOWED_HEADERS"),
            cors_allow_credentials: flag("CORS_ALLOW_CREDENTIALS"),
            jwt_secret: var("JWT_SECRET"),
            token_ttl_secs: parsed(var("JWT_TTL_SECS")),
            password_pepper: var("AUTH_PASSWORD_PEPPER"),
            storage_backend: var("STORAGE_BACKEND"),
            storage_local_root: path("STORAGE_LOCAL_ROOT"),
            storage_public_base_url: var("STORAGE_PUBLIC_BASE_URL"),
            storage_endpoint: var("STORAGE_ENDPOINT"),
            storage_bucket: var("STORAGE_BUCKET"),
            storage_api_key: var("STORAGE_API_KEY"),
            max_upload_bytes: parsed(var("MAX_UPLOAD_BYTES")),
            translation_enabled: flag("TRANSLATION_ENABLED"),
            llm_endpoint: var("LLM_ENDPOINT"),
            llm_api_key: var("LLM_API_KEY").or_else(|| var("OPENAI_API_KEY")),
            llm_model: var("LLM_MODEL"),
            llm_timeout_secs: parsed(var("LLM_TIMEOUT_SECS")),
            llm_temperature: parsed(var("LLM_TEMPERATURE")),
            dev_mode: flag("DEV_MODE"),
        }
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parsed<T: FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|value| value.trim().parse().ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
