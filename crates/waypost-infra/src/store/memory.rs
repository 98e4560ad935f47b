//! In-memory store implementations - used in tests and as fallback when
//! no database is configured. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use waypost_core::domain::{Comment, Post, User};
use waypost_core::error::StoreError;
use waypost_core::ports::{CommentStore, GeoQuery, PostStore, UserStore};

/// In-memory user collection with unique username/email enforcement.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        for existing in users.values() {
            if existing.username == user.username {
                return Err(StoreError::Duplicate {
                    field: "username".to_string(),
                });
            }
            if existing.email == user.email {
                return Err(StoreError::Duplicate {
                    field: "email".to_string(),
                });
            }
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn set_avatar(&self, id: Uuid, avatar: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.avatar = Some(avatar.to_string());
        Ok(user.clone())
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn push_post(&self, id: Uuid, post_id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.posts.push(post_id);
        Ok(())
    }

    async fn pull_post(&self, id: Uuid, post_id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.posts.retain(|p| *p != post_id);
        Ok(())
    }

    async fn push_comment(&self, id: Uuid, comment_id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.comments.push(comment_id);
        Ok(())
    }
}

/// In-memory post collection. `find_near` filters by haversine distance
/// and sorts nearest first, matching the document store's
/// nearest-neighbor order.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, post: Post) -> Result<Post, StoreError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn find_by_author(&self, author: Uuid) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        let mut result: Vec<Post> = posts.values().filter(|p| p.author == author).cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update_content(&self, post: &Post) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        let stored = posts.get_mut(&post.id).ok_or(StoreError::NotFound)?;
        stored.title = post.title.clone();
        stored.description = post.description.clone();
        stored.edited = post.edited;
        stored.updated_at = post.updated_at;
        Ok(())
    }

    async fn push_comment(&self, id: Uuid, comment_id: Uuid) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        post.comments.push(comment_id);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn find_near(&self, query: GeoQuery) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;

        let mut eligible: Vec<(f64, Post)> = posts
            .values()
            .filter(|p| p.author != query.exclude_author)
            .map(|p| (query.center.distance_km(&p.location), p))
            .filter(|(distance, _)| *distance <= query.max_distance_km)
            .map(|(distance, p)| (distance, p.clone()))
            .collect();

        // Nearest first; ties broken by id so pagination stays stable.
        eligible.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });

        Ok(eligible
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .map(|(_, p)| p)
            .collect())
    }
}

/// In-memory comment collection.
#[derive(Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<HashMap<Uuid, Comment>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn insert(&self, comment: Comment) -> Result<Comment, StoreError> {
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Comment>, StoreError> {
        let comments = self.comments.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| comments.get(id).cloned())
            .collect())
    }

    async fn posts_commented_by(&self, author: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let comments = self.comments.read().await;
        let mut by_time: Vec<&Comment> =
            comments.values().filter(|c| c.author == author).collect();
        by_time.sort_by_key(|c| c.created_at);

        let mut post_ids = Vec::new();
        for comment in by_time {
            if !post_ids.contains(&comment.post) {
                post_ids.push(comment.post);
            }
        }
        Ok(post_ids)
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, StoreError> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|_, c| c.post != post_id);
        Ok((before - comments.len()) as u64)
    }
}
