/// Placeholder JWT signing secret. Refused outside dev mode.
pub const DEFAULT_JWT_SECRET: &str = "change-me-arena-jwt-secret";

/// Placeholder Argon2 pepper. Refused outside dev mode.
pub const DEFAULT_PASSWORD_PEPPER: &str = "change-me-arena-password-pepper";

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1";

pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.2;

pub const DEFAULT_LOCAL_STORAGE_ROOT: &str = "./uploads";

/// Mount point for locally stored uploads; also the default public base URL.
pub const LOCAL_MEDIA_MOUNT: &str = "/media";

pub const MIN_SECRET_LENGTH: usize = 32;
