//! MongoDB store implementations.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::ReturnDocument,
};
use uuid::Uuid;

use waypost_core::domain::{Comment, Post, User};
use waypost_core::error::StoreError;
use waypost_core::ports::{CommentStore, GeoQuery, PostStore, UserStore};

use super::documents::{CommentDocument, PostDocument, UserDocument};

/// Map a write error, turning E11000 duplicate-key failures into
/// `StoreError::Duplicate` naming the violated field.
fn map_write_err(err: mongodb::error::Error) -> StoreError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_err)) = &*err.kind {
        if write_err.code == 11000 {
            let field = if write_err.message.contains("username") {
                "username"
            } else if write_err.message.contains("email") {
                "email"
            } else {
                "_id"
            };
            return StoreError::Duplicate {
                field: field.to_string(),
            };
        }
    }
    StoreError::Query(err.to_string())
}

fn map_query_err(err: mongodb::error::Error) -> StoreError {
    StoreError::Query(err.to_string())
}

pub struct MongoUserStore {
    collection: Collection<UserDocument>,
}

impl MongoUserStore {
    pub fn new(collection: Collection<UserDocument>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let document = UserDocument::from(user.clone());
        self.collection
            .insert_one(&document)
            .await
            .map_err(map_write_err)?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_query_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(map_query_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(doc! { "username": username })
            .await
            .map_err(map_query_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn set_avatar(&self, id: Uuid, avatar: &str) -> Result<User, StoreError> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id.to_string() },
                doc! { "$set": { "avatar": avatar } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_query_err)?
            .ok_or(StoreError::NotFound)?;
        User::try_from(updated)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$set": { "password_hash": password_hash } },
            )
            .await
            .map_err(map_query_err)?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn push_post(&self, id: Uuid, post_id: Uuid) -> Result<(), StoreError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$push": { "posts": post_id.to_string() } },
            )
            .await
            .map_err(map_query_err)?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn pull_post(&self, id: Uuid, post_id: Uuid) -> Result<(), StoreError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$pull": { "posts": post_id.to_string() } },
            )
            .await
            .map_err(map_query_err)?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn push_comment(&self, id: Uuid, comment_id: Uuid) -> Result<(), StoreError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$push": { "comments": comment_id.to_string() } },
            )
            .await
            .map_err(map_query_err)?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MongoPostStore {
    collection: Collection<PostDocument>,
}

impl MongoPostStore {
    pub fn new(collection: Collection<PostDocument>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn insert(&self, post: Post) -> Result<Post, StoreError> {
        let document = PostDocument::from(post.clone());
        self.collection
            .insert_one(&document)
            .await
            .map_err(map_write_err)?;
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_query_err)?
            .map(Post::try_from)
            .transpose()
    }

    async fn find_by_author(&self, author: Uuid) -> Result<Vec<Post>, StoreError> {
        let documents: Vec<PostDocument> = self
            .collection
            .find(doc! { "author": author.to_string() })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(map_query_err)?
            .try_collect()
            .await
            .map_err(map_query_err)?;
        documents.into_iter().map(Post::try_from).collect()
    }

    async fn update_content(&self, post: &Post) -> Result<(), StoreError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": post.id.to_string() },
                doc! { "$set": {
                    "title": &post.title,
                    "description": &post.description,
                    "edited": post.edited,
                    "updated_at": mongodb::bson::DateTime::from_chrono(post.updated_at),
                } },
            )
            .await
            .map_err(map_query_err)?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn push_comment(&self, id: Uuid, comment_id: Uuid) -> Result<(), StoreError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$push": { "comments": comment_id.to_string() } },
            )
            .await
            .map_err(map_query_err)?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_query_err)?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn find_near(&self, query: GeoQuery) -> Result<Vec<Post>, StoreError> {
        // $nearSphere returns nearest first; $maxDistance is in meters.
        let filter = doc! {
            "author": { "$ne": query.exclude_author.to_string() },
            "location": {
                "$nearSphere": {
                    "$geometry": {
                        "type": "Point",
                        "coordinates": [query.center.longitude, query.center.latitude],
                    },
                    "$maxDistance": query.max_distance_km * 1000.0,
                }
            }
        };

        let documents: Vec<PostDocument> = self
            .collection
            .find(filter)
            .skip(query.skip)
            .limit(query.limit)
            .await
            .map_err(map_query_err)?
            .try_collect()
            .await
            .map_err(map_query_err)?;
        documents.into_iter().map(Post::try_from).collect()
    }
}

pub struct MongoCommentStore {
    collection: Collection<CommentDocument>,
}

impl MongoCommentStore {
    pub fn new(collection: Collection<CommentDocument>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl CommentStore for MongoCommentStore {
    async fn insert(&self, comment: Comment) -> Result<Comment, StoreError> {
        let document = CommentDocument::from(comment.clone());
        self.collection
            .insert_one(&document)
            .await
            .map_err(map_write_err)?;
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_query_err)?
            .map(Comment::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Comment>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_strings: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let documents: Vec<CommentDocument> = self
            .collection
            .find(doc! { "_id": { "$in": &id_strings } })
            .await
            .map_err(map_query_err)?
            .try_collect()
            .await
            .map_err(map_query_err)?;

        let mut comments: Vec<Comment> = documents
            .into_iter()
            .map(Comment::try_from)
            .collect::<Result<_, _>>()?;

        // Return in the order the caller's id list dictates.
        comments.sort_by_key(|c| ids.iter().position(|id| *id == c.id));
        Ok(comments)
    }

    async fn posts_commented_by(&self, author: Uuid) -> Result<Vec<Uuid>, StoreError> {
        // Walk the author's comments oldest first and keep the first
        // occurrence of each post, so the result is first-comment order.
        let documents: Vec<CommentDocument> = self
            .collection
            .find(doc! { "author": author.to_string() })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(map_query_err)?
            .try_collect()
            .await
            .map_err(map_query_err)?;

        let mut post_ids = Vec::new();
        for document in documents {
            let post_id = Uuid::parse_str(&document.post)
                .map_err(|e| StoreError::Query(format!("malformed post id: {e}")))?;
            if !post_ids.contains(&post_id) {
                post_ids.push(post_id);
            }
        }
        Ok(post_ids)
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, StoreError> {
        let result = self
            .collection
            .delete_many(doc! { "post": post_id.to_string() })
            .await
            .map_err(map_query_err)?;
        Ok(result.deleted_count)
    }
}
