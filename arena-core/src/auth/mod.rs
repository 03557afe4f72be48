//! Password hashing, access tokens and credential validation.

pub mod crypto;
pub mod tokens;

pub use crypto::{AuthCrypto, AuthCryptoError};
pub use tokens::{Claims, IssuedToken, TokenIssuer};

use crate::error::{ArenaError, Result};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Trim and lower-case an email, rejecting obviously malformed ones.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ArenaError::invalid("email address is not valid"));
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty()
        || !domain_ok
        || email.chars().any(char::is_whitespace)
        || domain.contains('@')
    {
        return Err(ArenaError::invalid("email address is not valid"));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ArenaError::invalid(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

impl From<AuthCryptoError> for ArenaError {
    fn from(err: AuthCryptoError) -> Self {
        ArenaError::Internal(err.to_string())
    }
}
