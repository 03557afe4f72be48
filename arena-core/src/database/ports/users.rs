use async_trait::async_trait;
use arena_model::{Role, User};
use uuid::Uuid;

use crate::error::Result;

/// A user together with the password hash, which never leaves the
/// repository and auth layers.
#[derive(Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn create_user(&self, user: &User, password_hash: &str) -> Result<()>;
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()>;
}
