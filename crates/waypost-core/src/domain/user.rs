use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// User entity - identity record plus the denormalized back-reference
/// lists mirroring Post.author and Comment.author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Ids of posts authored by this user. Append-only mirror of the
    /// authoritative Post.author relation, pruned on post delete.
    pub posts: Vec<Uuid>,
    /// Ids of comments authored by this user.
    pub comments: Vec<Uuid>,
}

impl User {
    /// Create a new user with generated ID and timestamp. Username and
    /// email are validated here; the password must already be hashed.
    pub fn new(username: &str, email: &str, password_hash: String) -> Result<Self, DomainError> {
        let username = username.trim();
        let email = email.trim();
        validate_username(username)?;
        validate_email(email)?;

        Ok(Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            avatar: None,
            created_at: Utc::now(),
            posts: Vec::new(),
            comments: Vec::new(),
        })
    }
}

fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.len() < 3 || username.len() > 12 {
        return Err(DomainError::validation(
            "username",
            "Username must be between 3 and 12 characters long.",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(DomainError::validation(
            "username",
            "Username may only contain letters, digits and underscores.",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::validation("email", format!("{email} is not a valid email."));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    // Domain needs at least one dot with a non-empty label on each side.
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }
    Ok(())
}

/// Password policy: at least 6 characters with one lowercase, one
/// uppercase and one digit. Checked against the plaintext before hashing.
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.len() < 6 {
        return Err(DomainError::validation(
            "password",
            "Password must be at least 6 characters long.",
        ));
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(DomainError::validation(
            "password",
            "Password must contain at least one uppercase letter, one lowercase letter, and one number.",
        ));
    }
    Ok(())
}
