use std::sync::Arc;

use arena_model::{AuthResponse, LoginRequest, RegisterRequest, Role, User};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{AuthCrypto, TokenIssuer, normalize_email, validate_password};
use crate::database::ports::UserRepository;
use crate::error::{ArenaError, Result};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Registration, login and role management.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    crypto: Arc<AuthCrypto>,
    tokens: Arc<TokenIssuer>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

fn display_name(raw: &str) -> Result<String> {
    let nombre = raw.trim();
    if nombre.is_empty() {
        return Err(ArenaError::invalid("nombre is required"));
    }
    Ok(nombre.to_string())
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        crypto: Arc<AuthCrypto>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            users,
            crypto,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    fn respond(&self, user: User) -> Result<AuthResponse> {
        let issued = self.tokens.issue(&user)?;
        Ok(AuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    async fn create(&self, email: String, password: &str, nombre: String, role: Role) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            nombre,
            role,
            created_at: now,
            updated_at: now,
        };
        let hash = self.crypto.hash_password(password)?;
        self.users
            .create_user(&user, &hash)
            .await
            .map_err(|e| match e {
                ArenaError::Conflict(_) => ArenaError::Conflict("email already registered".to_string()),
                other => other,
            })?;
        Ok(user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let email = normalize_email(&request.email)?;
        validate_password(&request.password)?;
        let nombre = display_name(&request.nombre)?;

        let user = self.create(email, &request.password, nombre, Role::User).await?;
        info!(user_id = %user.id, "registered account");
        self.respond(user)
    }

    /// Unknown emails and wrong passwords fail with the same message.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let unauthorized = || ArenaError::Unauthorized(INVALID_CREDENTIALS.to_string());
        let email = normalize_email(&request.email).map_err(|_| unauthorized())?;

        let Some(stored) = self.users.find_by_email(&email).await? else {
            return Err(unauthorized());
        };
        if !self
            .crypto
            .verify_password(&request.password, &stored.password_hash)?
        {
            warn!(user_id = %stored.user.id, "failed login attempt");
            return Err(unauthorized());
        }

        self.respond(stored.user)
    }

    /// The current account as stored; it may have been deleted since the
    /// token was issued.
    pub async fn me(&self, user_id: Uuid) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ArenaError::Unauthorized("account no longer exists".to_string()))
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.list_users().await
    }

    pub async fn set_role(&self, actor: Uuid, target: Uuid, role: Role) -> Result<User> {
        if actor == target && role != Role::Admin {
            return Err(ArenaError::invalid("administrators cannot demote themselves"));
        }
        let user = self
            .users
            .update_role(target, role)
            .await?
            .ok_or_else(|| ArenaError::not_found(format!("user {target}")))?;
        info!(%actor, user_id = %target, role = %role, "changed account role");
        Ok(user)
    }

    /// Create an admin account, or promote an existing one and reset its
    /// password. Returns the account and whether it was created.
    pub async fn ensure_admin(&self, email: &str, password: &str, nombre: &str) -> Result<(User, bool)> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        if let Some(stored) = self.users.find_by_email(&email).await? {
            let hash = self.crypto.hash_password(password)?;
            self.users.update_password(stored.user.id, &hash).await?;
            let user = self
                .users
                .update_role(stored.user.id, Role::Admin)
                .await?
                .ok_or_else(|| ArenaError::not_found(format!("user {}", stored.user.id)))?;
            info!(user_id = %user.id, "promoted existing account to admin");
            return Ok((user, false));
        }

        let user = self
            .create(email, password, display_name(nombre)?, Role::Admin)
            .await?;
        info!(user_id = %user.id, "created admin account");
        Ok((user, true))
    }
}
