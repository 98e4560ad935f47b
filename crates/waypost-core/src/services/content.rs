//! Post and comment mutations, with the denormalized back-reference
//! bookkeeping the data model requires.
//!
//! Every logical operation here spans up to three single-document
//! writes. The primary entity write is authoritative and happens first;
//! the back-reference updates that follow are best effort. A failed
//! back-reference write is logged with both entity ids and never rolls
//! back the primary write, so a crash mid-operation leaves an
//! orphaned-but-valid record rather than a dangling reference.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, GeoPoint, Post, User};
use crate::error::DomainError;
use crate::ports::{CommentStore, PostStore, UserStore};
use crate::services::feed::{FeedService, PostWithComments};

pub struct ContentService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    feed: FeedService,
}

impl ContentService {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        let feed = FeedService::new(posts.clone(), comments.clone());
        Self {
            users,
            posts,
            comments,
            feed,
        }
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "user",
                id: user_id,
            })
    }

    async fn require_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "post",
                id: post_id,
            })
    }

    /// Create a post and append it to the author's `posts` list.
    pub async fn create_post(
        &self,
        author_id: Uuid,
        title: &str,
        description: &str,
        location: GeoPoint,
    ) -> Result<Post, DomainError> {
        let author = self.require_user(author_id).await?;
        let post = Post::new(author_id, author.username, title, description, location)?;

        // The post write is authoritative; it must be durable before the
        // author's list is touched.
        let post = self.posts.insert(post).await?;

        if let Err(err) = self.users.push_post(author_id, post.id).await {
            tracing::warn!(
                user_id = %author_id,
                post_id = %post.id,
                error = %err,
                "failed to append post to author's post list; reference orphaned"
            );
        }

        Ok(post)
    }

    /// Create a comment on an existing post (anyone may comment, own
    /// posts included) and append it to both back-reference lists.
    pub async fn create_comment(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        content: &str,
    ) -> Result<Comment, DomainError> {
        let author = self.require_user(author_id).await?;
        self.require_post(post_id).await?;

        let comment = Comment::new(author_id, author.username, post_id, content)?;
        let comment = self.comments.insert(comment).await?;

        if let Err(err) = self.users.push_comment(author_id, comment.id).await {
            tracing::warn!(
                user_id = %author_id,
                comment_id = %comment.id,
                error = %err,
                "failed to append comment to author's comment list; reference orphaned"
            );
        }
        if let Err(err) = self.posts.push_comment(post_id, comment.id).await {
            tracing::warn!(
                post_id = %post_id,
                comment_id = %comment.id,
                error = %err,
                "failed to append comment to post's comment list; reference orphaned"
            );
        }

        Ok(comment)
    }

    /// Edit a post's content fields. Only the author may edit; the
    /// author and location references never change.
    pub async fn update_post(
        &self,
        requester: Uuid,
        post_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Post, DomainError> {
        let mut post = self.require_post(post_id).await?;
        if post.author != requester {
            return Err(DomainError::Forbidden);
        }

        post.apply_edit(title, description)?;
        self.posts.update_content(&post).await?;
        Ok(post)
    }

    /// Delete a post and cascade to its comments. Children go first so
    /// an interrupted delete never leaves a post pointing at missing
    /// comments; the author's list is pruned last, best effort.
    pub async fn delete_post(&self, requester: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let post = self.require_post(post_id).await?;
        if post.author != requester {
            return Err(DomainError::Forbidden);
        }

        let removed = self.comments.delete_by_post(post_id).await?;
        self.posts.delete(post_id).await?;
        tracing::info!(post_id = %post_id, comments_removed = removed, "post deleted");

        if let Err(err) = self.users.pull_post(post.author, post_id).await {
            tracing::warn!(
                user_id = %post.author,
                post_id = %post_id,
                error = %err,
                "failed to remove post from author's post list; reference orphaned"
            );
        }

        Ok(())
    }

    /// One post with its comments attached.
    pub async fn get_post(&self, post_id: Uuid) -> Result<PostWithComments, DomainError> {
        let post = self.require_post(post_id).await?;
        self.feed.hydrate(post).await
    }

    /// All posts authored by one user, comments attached.
    pub async fn posts_by_author(&self, user_id: Uuid) -> Result<Vec<PostWithComments>, DomainError> {
        let posts = self.posts.find_by_author(user_id).await?;
        self.feed.hydrate_all(posts).await
    }

    /// Posts the user has commented on, excluding posts the user
    /// authored. Ids whose post has since been deleted are dropped.
    pub async fn commented_posts(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PostWithComments>, DomainError> {
        let post_ids = self.comments.posts_commented_by(user_id).await?;

        let mut posts = Vec::new();
        for post_id in post_ids {
            if let Some(post) = self.posts.find_by_id(post_id).await? {
                if post.author != user_id {
                    posts.push(post);
                }
            }
        }
        self.feed.hydrate_all(posts).await
    }
}
