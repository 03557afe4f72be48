use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use url::Url;

use crate::{
    constants::{
        DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_JWT_SECRET,
        DEFAULT_LLM_ENDPOINT, DEFAULT_LLM_MODEL, DEFAULT_LLM_TEMPERATURE,
        DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_LOCAL_STORAGE_ROOT,
        DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PASSWORD_PEPPER,
        DEFAULT_TOKEN_TTL_SECS, LOCAL_MEDIA_MOUNT,
    },
    models::{
        AuthConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
        ServerConfig, StorageBackend, StorageConfig, TranslationConfig,
    },
    sources::{EnvConfig, FileConfig, FileDatabaseConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["arena.toml", "config/arena.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        self.load_from_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Resolve configuration from already gathered environment values.
    ///
    /// Skips `.env` handling, which makes it the entry point for tests that
    /// need deterministic input.
    pub fn load_from_env(
        &self,
        env_config: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) =
            self.load_file_config(&env_config)?;

        let (config, warnings) = self.compose_config(
            file_config,
            env_config,
            config_path,
            env_file_loaded,
        )?;

        config
            .ensure_directories()
            .map_err(|source| ConfigLoadError::Filesystem { source })?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let mut source = ConfigPathSource::default();

        if let Some(explicit) = &self.options.config_path {
            source.explicit = Some(explicit.clone());
        } else if let Some(from_env) = &env_config.config_path {
            source.env = Some(from_env.clone());
        } else {
            source.default = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists());
        }

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((None, None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if file_config.is_none() {
            warnings.push_with_hint(
                "No arena.toml detected; using environment variables and defaults",
                "Create arena.toml or set ARENA_CONFIG_PATH to pin settings in a file",
            );
        }

        let FileConfig {
            server: file_server,
            database: file_database,
            cors: file_cors,
            auth: file_auth,
            storage: file_storage,
            translation: file_translation,
            dev_mode: file_dev_mode,
        } = file_config.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(3000),
        };

        let database = DatabaseConfig {
            url: self.resolve_database_url(&env, &file_database)?,
            max_connections: env
                .database_max_connections
                .or(file_database.max_connections)
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
        };

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .clone()
                .or(file_cors.allowed_origins)
                .unwrap_or_else(default_cors_origins),
            allowed_methods: env
                .cors_allowed_methods
                .clone()
                .or(file_cors.allowed_methods)
                .unwrap_or_else(default_cors_methods),
            allowed_headers: env
                .cors_allowed_headers
                .clone()
                .or(file_cors.allowed_headers)
                .unwrap_or_else(default_cors_headers),
            allow_credentials: env
                .cors_allow_credentials
                .or(file_cors.allow_credentials)
                .unwrap_or(false),
        };

        let auth = AuthConfig {
            jwt_secret: env
                .jwt_secret
                .clone()
                .or(file_auth.jwt_secret)
                .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
            token_ttl_secs: env
                .token_ttl_secs
                .or(file_auth.token_ttl_secs)
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            password_pepper: env
                .password_pepper
                .clone()
                .or(file_auth.password_pepper)
                .unwrap_or_else(|| DEFAULT_PASSWORD_PEPPER.to_string()),
        };

        let backend = match env.storage_backend.as_deref() {
            Some(raw) => raw.parse::<StorageBackend>().map_err(|reason| {
                ConfigLoadError::InvalidValue {
                    field: "STORAGE_BACKEND",
                    reason,
                }
            })?,
            None => file_storage.backend.unwrap_or_default(),
        };

        let storage = StorageConfig {
            backend,
            local_root: env
                .storage_local_root
                .clone()
                .or(file_storage.local_root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_STORAGE_ROOT)),
            public_base_url: env
                .storage_public_base_url
                .clone()
                .or(file_storage.public_base_url)
                .unwrap_or_else(|| LOCAL_MEDIA_MOUNT.to_string())
                .trim_end_matches('/')
                .to_string(),
            endpoint: env
                .storage_endpoint
                .clone()
                .or(file_storage.endpoint)
                .map(|endpoint| endpoint.trim_end_matches('/').to_string()),
            bucket: env.storage_bucket.clone().or(file_storage.bucket),
            api_key: env.storage_api_key.clone().or(file_storage.api_key),
            max_upload_bytes: env
                .max_upload_bytes
                .or(file_storage.max_upload_bytes)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let translation_api_key =
            env.llm_api_key.clone().or(file_translation.api_key);
        let translation_requested = env
            .translation_enabled
            .or(file_translation.enabled)
            .unwrap_or(true);
        if translation_requested && translation_api_key.is_none() {
            warnings.push_with_hint(
                "No LLM API key configured; automatic translation is disabled",
                "Set LLM_API_KEY (or OPENAI_API_KEY) to enable _en/_pt translation",
            );
        }

        let translation = TranslationConfig {
            enabled: translation_requested && translation_api_key.is_some(),
            endpoint: env
                .llm_endpoint
                .clone()
                .or(file_translation.endpoint)
                .unwrap_or_else(|| DEFAULT_LLM_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: translation_api_key,
            model: env
                .llm_model
                .clone()
                .or(file_translation.model)
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            timeout_secs: env
                .llm_timeout_secs
                .or(file_translation.timeout_secs)
                .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS),
            temperature: env
                .llm_temperature
                .or(file_translation.temperature)
                .unwrap_or(DEFAULT_LLM_TEMPERATURE),
        };

        let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(false);

        let config = Config {
            server,
            database,
            cors,
            auth,
            storage,
            translation,
            dev_mode,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };

        let guard_warnings = validation::apply_guard_rails(&config)?;
        warnings.extend(guard_warnings);

        Ok((config, warnings))
    }

    fn resolve_database_url(
        &self,
        env: &EnvConfig,
        file_database: &FileDatabaseConfig,
    ) -> Result<Option<String>, ConfigLoadError> {
        if let Some(url) = env.database_url.clone() {
            return Ok(Some(url));
        }

        if let Some(path) = env.database_url_file.as_ref()
            && let Some(url) = read_secret_file(path)?
        {
            return Ok(Some(url));
        }

        if let Some(stored_url) = file_database.url.as_deref() {
            let trimmed = stored_url.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let mut parsed = Url::parse(trimmed).map_err(|source| {
                ConfigLoadError::InvalidDatabaseUrl { source }
            })?;
            if parsed.password().is_none()
                && let Some(password) =
                    resolve_database_password(env, file_database)?
            {
                parsed
                    .set_password(Some(&password))
                    .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
            }
            return Ok(Some(parsed.to_string()));
        }

        if let (Some(host), Some(user), Some(name)) = (
            env.database_host.as_deref(),
            env.database_user.as_deref(),
            env.database_name.as_deref(),
        ) {
            let port = env.database_port.unwrap_or(5432);
            let mut url =
                Url::parse(&format!("postgresql://{host}:{port}/{name}"))
                    .map_err(|source| ConfigLoadError::InvalidDatabaseUrl {
                        source,
                    })?;
            url.set_username(user).map_err(|_| {
                ConfigLoadError::InvalidDatabaseUsername {
                    username: user.to_string(),
                }
            })?;
            if let Some(password) =
                resolve_database_password(env, file_database)?
            {
                url.set_password(Some(&password))
                    .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
            }
            return Ok(Some(url.to_string()));
        }

        Ok(None)
    }
}

fn resolve_database_password(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(password) = env.database_password.clone() {
        return Ok(Some(password));
    }

    for path in [
        env.database_password_file.as_ref(),
        file_database.password_file.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(secret) = read_secret_file(path)? {
            return Ok(Some(secret));
        }
    }

    Ok(None)
}

fn read_secret_file(path: &Path) -> Result<Option<String>, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::SecretFileIo {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("invalid database URL")]
    InvalidDatabaseUrl {
        #[source]
        source: url::ParseError,
    },
    #[error("invalid database username '{username}'")]
    InvalidDatabaseUsername { username: String },
    #[error("failed to encode database password into URL")]
    InvalidDatabasePassword,
    #[error("failed to read secret file {path}")]
    SecretFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("filesystem initialization failed")]
    Filesystem {
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

impl ConfigPathSource {
    fn resolved_path(&self) -> Option<(PathBuf, ConfigPathProvenance)> {
        if let Some(path) = &self.explicit {
            return Some((path.clone(), ConfigPathProvenance::Explicit));
        }
        if let Some(path) = &self.env {
            return Some((path.clone(), ConfigPathProvenance::Env));
        }
        self.default
            .as_ref()
            .map(|path| (path.clone(), ConfigPathProvenance::Default))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(
            self,
            ConfigPathProvenance::Explicit | ConfigPathProvenance::Env
        )
    }
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_cors_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_cors_headers() -> Vec<String> {
    ["Authorization", "Content-Type", "Accept-Language"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
