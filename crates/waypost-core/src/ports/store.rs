//! Store ports - one trait per collection. Every reference between
//! entities is an opaque id resolved through these traits; the only
//! atomicity the stores promise is per-document.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, GeoPoint, Post, User};
use crate::error::StoreError;

/// Parameters for a nearest-neighbor post query.
#[derive(Debug, Clone, Copy)]
pub struct GeoQuery {
    pub center: GeoPoint,
    pub max_distance_km: f64,
    /// Author whose posts are filtered out of the result.
    pub exclude_author: Uuid,
    pub skip: u64,
    pub limit: i64,
}

/// User collection. Usernames and emails are unique; inserting a
/// duplicate fails with `StoreError::Duplicate` naming the field.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn set_avatar(&self, id: Uuid, avatar: &str) -> Result<User, StoreError>;

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError>;

    /// Append a post id to the user's `posts` back-reference list.
    async fn push_post(&self, id: Uuid, post_id: Uuid) -> Result<(), StoreError>;

    /// Remove a post id from the user's `posts` back-reference list.
    async fn pull_post(&self, id: Uuid, post_id: Uuid) -> Result<(), StoreError>;

    /// Append a comment id to the user's `comments` back-reference list.
    async fn push_comment(&self, id: Uuid, comment_id: Uuid) -> Result<(), StoreError>;
}

/// Post collection, including the geospatial lookup.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: Post) -> Result<Post, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;

    /// All posts by one author, newest first.
    async fn find_by_author(&self, author: Uuid) -> Result<Vec<Post>, StoreError>;

    /// Persist an edit: title, description, edited flag, updated_at.
    /// Author, location and comment list are never touched by this call.
    async fn update_content(&self, post: &Post) -> Result<(), StoreError>;

    /// Append a comment id to the post's `comments` list.
    async fn push_comment(&self, id: Uuid, comment_id: Uuid) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Posts within `max_distance_km` of the center, excluding the given
    /// author, nearest first, paginated by skip/limit.
    async fn find_near(&self, query: GeoQuery) -> Result<Vec<Post>, StoreError>;
}

/// Comment collection.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<Comment, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError>;

    /// Resolve an ordered id list, silently dropping ids that no longer
    /// exist (a comment may vanish between the parent read and this one).
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Comment>, StoreError>;

    /// Distinct ids of posts the user has commented on, ordered by the
    /// user's first comment on each post, oldest first.
    async fn posts_commented_by(&self, author: Uuid) -> Result<Vec<Uuid>, StoreError>;

    /// Delete every comment whose `post` field matches; returns the count.
    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, StoreError>;
}
