//! Authentication ports: token issuance/verification and password hashing.

use uuid::Uuid;

/// Claims carried by a signed identity token. The token proves identity
/// only; ownership checks happen against the stored entities.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub exp: i64,
}

/// Token service trait for signed identity tokens.
pub trait TokenService: Send + Sync {
    /// Issue a signed token for a user.
    fn issue(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Verify signature and expiry, returning the embedded claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens, in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password into a digest.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored digest.
    fn verify(&self, password: &str, digest: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing token cookie")]
    MissingToken,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
