//! Identity operations: registration, login, profile maintenance.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{validate_password, User};
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenService, UserStore};

/// Service for user identity records. Password digests never leave this
/// layer in plaintext-comparable form; hashing and token signing are
/// delegated to the auth ports.
pub struct AccountService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Register a new user. Duplicate username/email surfaces as a
    /// validation-class duplicate error naming the field.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        validate_password(password)?;
        let digest = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let user = User::new(username, email, digest)?;

        let user = self.users.insert(user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Verify credentials and issue a fresh signed token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), DomainError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or(DomainError::Unauthenticated)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            return Err(DomainError::Unauthenticated);
        }

        let token = self
            .tokens
            .issue(user.id)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok((user, token))
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "user",
                id: user_id,
            })
    }

    /// Verify the old password before storing a digest of the new one.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let user = self.profile(user_id).await?;

        let old_valid = self
            .passwords
            .verify(old_password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !old_valid {
            return Err(DomainError::Unauthenticated);
        }

        validate_password(new_password)?;
        let digest = self
            .passwords
            .hash(new_password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        self.users.set_password_hash(user_id, &digest).await?;
        Ok(())
    }

    pub async fn update_avatar(&self, user_id: Uuid, avatar: &str) -> Result<User, DomainError> {
        // Make sure the not-found case is reported as such rather than
        // as a store error from the update.
        self.profile(user_id).await?;
        Ok(self.users.set_avatar(user_id, avatar).await?)
    }
}
