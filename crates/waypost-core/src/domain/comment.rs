use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Comment entity - holds non-owning back-references to its author and
/// parent post; deleted only via the parent post's cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    /// Denormalized display name of the author.
    pub author_username: String,
    pub author: Uuid,
    pub post: Uuid,
    pub edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        author: Uuid,
        author_username: String,
        post: Uuid,
        content: &str,
    ) -> Result<Self, DomainError> {
        let content = content.trim();
        validate_content(content)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            content: content.to_string(),
            author_username,
            author,
            post,
            edited: false,
            created_at: now,
            updated_at: now,
        })
    }
}

fn validate_content(content: &str) -> Result<(), DomainError> {
    match content.len() {
        0 => Err(DomainError::validation("content", "Content is required.")),
        1..=2 => Err(DomainError::validation(
            "content",
            "Content must be at least 3 characters long.",
        )),
        3..=300 => Ok(()),
        _ => Err(DomainError::validation(
            "content",
            "Content cannot exceed 300 characters.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let author = Uuid::new_v4();
        let post = Uuid::new_v4();
        assert!(Comment::new(author, "ada".into(), post, "ok!").is_ok());
        assert!(Comment::new(author, "ada".into(), post, "no").is_err());
        assert!(Comment::new(author, "ada".into(), post, &"x".repeat(301)).is_err());
    }

    #[test]
    fn trims_content() {
        let c = Comment::new(Uuid::new_v4(), "ada".into(), Uuid::new_v4(), "  nice  ").unwrap();
        assert_eq!(c.content, "nice");
        assert!(!c.edited);
    }
}
