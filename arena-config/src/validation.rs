use axum::http::{HeaderValue, Method, header::HeaderName};
use thiserror::Error;

use crate::constants::MIN_SECRET_LENGTH;
use crate::models::{AuthConfig, Config, CorsConfig, StorageBackend};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("authentication secret {field} {reason}")]
    WeakSecret { field: &'static str, reason: String },
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
    #[error("remote storage requires {field} to be set")]
    IncompleteStorage { field: &'static str },
    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.dev_mode {
        if config.auth.is_default_jwt_secret()
            || config.auth.is_default_pepper()
        {
            warnings.push_with_hint(
                "Using placeholder authentication secrets in dev mode",
                "Set JWT_SECRET and AUTH_PASSWORD_PEPPER before deploying",
            );
        }
    } else {
        enforce_secrets(&config.auth)?;
        if config.cors.is_wildcard_included() {
            return Err(ConfigGuardRailError::DangerousCorsWildcard);
        }
        validate_origins(&config.cors)?;
    }

    validate_cors(&config.cors)?;

    if config.auth.token_ttl_secs == 0 {
        return Err(ConfigGuardRailError::ZeroLimit {
            field: "JWT_TTL_SECS",
        });
    }
    if config.storage.max_upload_bytes == 0 {
        return Err(ConfigGuardRailError::ZeroLimit {
            field: "MAX_UPLOAD_BYTES",
        });
    }

    if config.storage.backend == StorageBackend::Http {
        if config.storage.endpoint.is_none() {
            return Err(ConfigGuardRailError::IncompleteStorage {
                field: "STORAGE_ENDPOINT",
            });
        }
        if config.storage.bucket.is_none() {
            return Err(ConfigGuardRailError::IncompleteStorage {
                field: "STORAGE_BUCKET",
            });
        }
        if config.storage.api_key.is_none() {
            return Err(ConfigGuardRailError::IncompleteStorage {
                field: "STORAGE_API_KEY",
            });
        }
    }

    if config.database.url.is_none() {
        warnings.push_with_hint(
            "DATABASE_URL not configured; the server cannot start without a database",
            "Set DATABASE_URL or DATABASE_HOST/DATABASE_USER/DATABASE_NAME",
        );
    }

    if config.cors.allow_credentials && config.cors.is_wildcard_included() {
        warnings.push(
            "CORS credentials allowed alongside wildcard origin; browsers will reject such configuration",
        );
    }

    Ok(warnings)
}

fn enforce_secrets(auth: &AuthConfig) -> Result<(), ConfigGuardRailError> {
    if auth.is_default_pepper() {
        return Err(ConfigGuardRailError::WeakSecret {
            field: "AUTH_PASSWORD_PEPPER",
            reason: "uses the default placeholder value".into(),
        });
    }

    if auth.password_pepper.len() < MIN_SECRET_LENGTH {
        return Err(ConfigGuardRailError::WeakSecret {
            field: "AUTH_PASSWORD_PEPPER",
            reason: format!("must be at least {MIN_SECRET_LENGTH} characters"),
        });
    }

    if auth.is_default_jwt_secret() {
        return Err(ConfigGuardRailError::WeakSecret {
            field: "JWT_SECRET",
            reason: "uses the default placeholder value".into(),
        });
    }

    if auth.jwt_secret.len() < MIN_SECRET_LENGTH {
        return Err(ConfigGuardRailError::WeakSecret {
            field: "JWT_SECRET",
            reason: format!("must be at least {MIN_SECRET_LENGTH} characters"),
        });
    }

    Ok(())
}

fn validate_origins(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allowed_origins.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason: "CORS_ALLOWED_ORIGINS must list at least one origin when DEV_MODE is false"
                .into(),
        });
    }

    for origin in &cors.allowed_origins {
        HeaderValue::from_str(origin.trim()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!("invalid origin `{origin}` in CORS_ALLOWED_ORIGINS"),
            }
        })?;
    }

    Ok(())
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allowed_methods.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason:
                "CORS_ALLOWED_METHODS must include at least one HTTP method"
                    .into(),
        });
    }

    for method in &cors.allowed_methods {
        Method::from_bytes(method.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid HTTP method `{method}` in CORS_ALLOWED_METHODS"
                ),
            }
        })?;
    }

    if cors.allowed_headers.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason:
                "CORS_ALLOWED_HEADERS must include at least one header name"
                    .into(),
        });
    }

    for header in &cors.allowed_headers {
        HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid header name `{header}` in CORS_ALLOWED_HEADERS"
                ),
            }
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_JWT_SECRET, DEFAULT_PASSWORD_PEPPER};
    use crate::models::{
        ConfigMetadata, DatabaseConfig, ServerConfig, StorageConfig,
        TranslationConfig,
    };
    use std::path::PathBuf;

    fn base_config(dev_mode: bool) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: Some("postgresql://localhost/arena".into()),
                max_connections: 5,
            },
            cors: CorsConfig {
                allowed_origins: vec!["https://arena.example".into()],
                allowed_methods: vec!["GET".into(), "POST".into()],
                allowed_headers: vec!["Authorization".into()],
                allow_credentials: false,
            },
            auth: AuthConfig {
                jwt_secret: "j".repeat(MIN_SECRET_LENGTH),
                token_ttl_secs: 3600,
                password_pepper: "p".repeat(MIN_SECRET_LENGTH),
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                local_root: PathBuf::from("./uploads"),
                public_base_url: "/media".into(),
                endpoint: None,
                bucket: None,
                api_key: None,
                max_upload_bytes: 1024,
            },
            translation: TranslationConfig {
                enabled: false,
                endpoint: "https://llm.example/v1".into(),
                api_key: None,
                model: "test".into(),
                timeout_secs: 5,
                temperature: 0.0,
            },
            dev_mode,
            metadata: ConfigMetadata::default(),
        }
    }

    #[test]
    fn strong_production_config_passes() {
        let warnings = apply_guard_rails(&base_config(false)).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn placeholder_secrets_fail_outside_dev_mode() {
        let mut config = base_config(false);
        config.auth.jwt_secret = DEFAULT_JWT_SECRET.into();
        let err = apply_guard_rails(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigGuardRailError::WeakSecret {
                field: "JWT_SECRET",
                ..
            }
        ));
    }

    #[test]
    fn placeholder_secrets_only_warn_in_dev_mode() {
        let mut config = base_config(true);
        config.auth.password_pepper = DEFAULT_PASSWORD_PEPPER.into();
        let warnings = apply_guard_rails(&config).unwrap();
        assert_eq!(warnings.items.len(), 1);
    }

    #[test]
    fn short_pepper_is_rejected() {
        let mut config = base_config(false);
        config.auth.password_pepper = "short".into();
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::WeakSecret {
                field: "AUTH_PASSWORD_PEPPER",
                ..
            })
        ));
    }

    #[test]
    fn wildcard_origin_is_rejected_in_production() {
        let mut config = base_config(false);
        config.cors.allowed_origins = vec!["*".into()];
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::DangerousCorsWildcard)
        ));
    }

    #[test]
    fn production_requires_valid_origins() {
        let mut config = base_config(false);
        config.cors.allowed_origins = vec![];
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::InvalidCorsConfig { .. })
        ));

        config.cors.allowed_origins = vec!["https://arena\u{7f}.example".into()];
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::InvalidCorsConfig { .. })
        ));

        let mut dev = base_config(true);
        dev.cors.allowed_origins = vec![];
        assert!(apply_guard_rails(&dev).is_ok());
    }

    #[test]
    fn invalid_cors_method_is_rejected() {
        let mut config = base_config(true);
        config.cors.allowed_methods = vec!["GE T".into()];
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::InvalidCorsConfig { .. })
        ));
    }

    #[test]
    fn http_storage_requires_bucket_and_key() {
        let mut config = base_config(true);
        config.storage.backend = StorageBackend::Http;
        config.storage.endpoint = Some("https://storage.example".into());
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::IncompleteStorage {
                field: "STORAGE_BUCKET"
            })
        ));

        config.storage.bucket = Some("arena".into());
        config.storage.api_key = Some("service-key".into());
        assert!(apply_guard_rails(&config).is_ok());
    }

    #[test]
    fn zero_upload_limit_is_rejected() {
        let mut config = base_config(true);
        config.storage.max_upload_bytes = 0;
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::ZeroLimit {
                field: "MAX_UPLOAD_BYTES"
            })
        ));
    }
}
