use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::GeoPoint;
use crate::error::DomainError;

/// Post entity - a geotagged post. The `comments` list is the
/// authoritative membership used for cascade delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Denormalized display name of the author.
    pub author_username: String,
    pub author: Uuid,
    pub location: GeoPoint,
    pub comments: Vec<Uuid>,
    pub edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author: Uuid,
        author_username: String,
        title: &str,
        description: &str,
        location: GeoPoint,
    ) -> Result<Self, DomainError> {
        let title = title.trim();
        let description = description.trim();
        validate_title(title)?;
        validate_description(description)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            author_username,
            author,
            location,
            comments: Vec::new(),
            edited: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an edit. Absent fields keep their current value; the author
    /// and location never change here.
    pub fn apply_edit(
        &mut self,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), DomainError> {
        if let Some(title) = title.map(str::trim) {
            validate_title(title)?;
            self.title = title.to_string();
        }
        if let Some(description) = description.map(str::trim) {
            validate_description(description)?;
            self.description = description.to_string();
        }
        self.edited = true;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    match title.len() {
        0 => Err(DomainError::validation("title", "Title is required.")),
        1..=4 => Err(DomainError::validation(
            "title",
            "Title must be at least 5 characters long.",
        )),
        5..=100 => Ok(()),
        _ => Err(DomainError::validation(
            "title",
            "Title cannot exceed 100 characters.",
        )),
    }
}

fn validate_description(description: &str) -> Result<(), DomainError> {
    match description.len() {
        0 => Err(DomainError::validation(
            "description",
            "Description is required.",
        )),
        1..=9 => Err(DomainError::validation(
            "description",
            "Description must be at least 10 characters long.",
        )),
        10..=5000 => Ok(()),
        _ => Err(DomainError::validation(
            "description",
            "Description cannot exceed 5000 characters.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> GeoPoint {
        GeoPoint::new(13.4, 52.5).unwrap()
    }

    #[test]
    fn trims_and_validates() {
        let post = Post::new(
            Uuid::new_v4(),
            "ada".into(),
            "  Lost keys  ",
            "Found a set of keys by the fountain.",
            point(),
        )
        .unwrap();
        assert_eq!(post.title, "Lost keys");
        assert!(!post.edited);
    }

    #[test]
    fn rejects_short_title() {
        let err = Post::new(Uuid::new_v4(), "ada".into(), "hey", "long enough text", point());
        assert!(err.is_err());
    }

    #[test]
    fn edit_sets_flag_and_keeps_absent_fields() {
        let mut post = Post::new(
            Uuid::new_v4(),
            "ada".into(),
            "Lost keys",
            "Found a set of keys by the fountain.",
            point(),
        )
        .unwrap();
        post.apply_edit(Some("Found keys"), None).unwrap();
        assert_eq!(post.title, "Found keys");
        assert_eq!(post.description, "Found a set of keys by the fountain.");
        assert!(post.edited);
    }

    #[test]
    fn edit_rejects_invalid_description() {
        let mut post = Post::new(
            Uuid::new_v4(),
            "ada".into(),
            "Lost keys",
            "Found a set of keys by the fountain.",
            point(),
        )
        .unwrap();
        assert!(post.apply_edit(None, Some("short")).is_err());
    }
}
