//! Geospatial feed: paginated, distance-bounded, exclusion-filtered.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Comment, GeoPoint, Post};
use crate::error::DomainError;
use crate::ports::{CommentStore, GeoQuery, PostStore};

/// Fixed feed radius around the caller's position.
pub const FEED_RADIUS_KM: f64 = 50.0;

/// Fixed page size; pages are 1-based.
pub const FEED_PAGE_SIZE: i64 = 5;

/// A post hydrated with its comments for list responses. The post keeps
/// its raw comment id list; the hydrated views sit alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithComments {
    pub post: Post,
    pub comments: Vec<CommentView>,
}

/// Comment projection for hydrated posts: content plus the author's
/// display name, nothing else about the author.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub author_username: String,
    pub edited: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            author_username: comment.author_username,
            edited: comment.edited,
            created_at: comment.created_at,
        }
    }
}

/// Wraps the post store's nearest-neighbor capability into the
/// "posts near me, not mine" feed contract.
pub struct FeedService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostStore>, comments: Arc<dyn CommentStore>) -> Self {
        Self { posts, comments }
    }

    /// Page of posts within 50 km of the given position, nearest first,
    /// excluding the caller's own posts. Both coordinates are required;
    /// there is no default position.
    pub async fn nearby(
        &self,
        exclude_author: Uuid,
        longitude: Option<f64>,
        latitude: Option<f64>,
        page: i64,
    ) -> Result<Vec<PostWithComments>, DomainError> {
        let longitude = longitude.ok_or_else(|| {
            DomainError::validation("longitude", "Longitude query parameter is required.")
        })?;
        let latitude = latitude.ok_or_else(|| {
            DomainError::validation("latitude", "Latitude query parameter is required.")
        })?;
        if page < 1 {
            return Err(DomainError::validation("page", "Page numbers start at 1."));
        }
        // page is caller-supplied; the skip offset must not overflow.
        let skip = (page - 1)
            .checked_mul(FEED_PAGE_SIZE)
            .ok_or_else(|| DomainError::validation("page", "Page number is out of range."))?;

        let center = GeoPoint::new(longitude, latitude)?;
        let posts = self
            .posts
            .find_near(GeoQuery {
                center,
                max_distance_km: FEED_RADIUS_KM,
                exclude_author,
                skip: skip as u64,
                limit: FEED_PAGE_SIZE,
            })
            .await?;

        self.hydrate_all(posts).await
    }

    /// Attach each post's comments, in the order the post's comment list
    /// records them. Ids whose comment has vanished are dropped.
    pub async fn hydrate(&self, post: Post) -> Result<PostWithComments, DomainError> {
        let comments = self
            .comments
            .find_many(&post.comments)
            .await?
            .into_iter()
            .map(CommentView::from)
            .collect();
        Ok(PostWithComments { post, comments })
    }

    pub async fn hydrate_all(&self, posts: Vec<Post>) -> Result<Vec<PostWithComments>, DomainError> {
        let mut hydrated = Vec::with_capacity(posts.len());
        for post in posts {
            hydrated.push(self.hydrate(post).await?);
        }
        Ok(hydrated)
    }
}
