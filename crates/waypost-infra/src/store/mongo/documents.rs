//! BSON document shapes and their conversions to/from the domain
//! entities. Ids travel as strings so filters stay plain; timestamps
//! use BSON datetimes.

use mongodb::bson;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use waypost_core::domain::{Comment, GeoPoint, Post, User};
use waypost_core::error::StoreError;

fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::Query(format!("malformed id {raw}: {e}")))
}

fn parse_ids(raw: &[String]) -> Result<Vec<Uuid>, StoreError> {
    raw.iter().map(|s| parse_id(s)).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub created_at: bson::DateTime,
    pub posts: Vec<String>,
    pub comments: Vec<String>,
}

impl From<User> for UserDocument {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            avatar: user.avatar,
            created_at: bson::DateTime::from_chrono(user.created_at),
            posts: user.posts.iter().map(Uuid::to_string).collect(),
            comments: user.comments.iter().map(Uuid::to_string).collect(),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = StoreError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&doc.id)?,
            username: doc.username,
            email: doc.email,
            password_hash: doc.password_hash,
            avatar: doc.avatar,
            created_at: doc.created_at.to_chrono(),
            posts: parse_ids(&doc.posts)?,
            comments: parse_ids(&doc.comments)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub author_username: String,
    pub author: String,
    /// GeoJSON point, indexed 2dsphere.
    pub location: GeoPoint,
    pub comments: Vec<String>,
    pub edited: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl From<Post> for PostDocument {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title,
            description: post.description,
            author_username: post.author_username,
            author: post.author.to_string(),
            location: post.location,
            comments: post.comments.iter().map(Uuid::to_string).collect(),
            edited: post.edited,
            created_at: bson::DateTime::from_chrono(post.created_at),
            updated_at: bson::DateTime::from_chrono(post.updated_at),
        }
    }
}

impl TryFrom<PostDocument> for Post {
    type Error = StoreError;

    fn try_from(doc: PostDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&doc.id)?,
            title: doc.title,
            description: doc.description,
            author_username: doc.author_username,
            author: parse_id(&doc.author)?,
            location: doc.location,
            comments: parse_ids(&doc.comments)?,
            edited: doc.edited,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub author_username: String,
    pub author: String,
    pub post: String,
    pub edited: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl From<Comment> for CommentDocument {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            content: comment.content,
            author_username: comment.author_username,
            author: comment.author.to_string(),
            post: comment.post.to_string(),
            edited: comment.edited,
            created_at: bson::DateTime::from_chrono(comment.created_at),
            updated_at: bson::DateTime::from_chrono(comment.updated_at),
        }
    }
}

impl TryFrom<CommentDocument> for Comment {
    type Error = StoreError;

    fn try_from(doc: CommentDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&doc.id)?,
            content: doc.content,
            author_username: doc.author_username,
            author: parse_id(&doc.author)?,
            post: parse_id(&doc.post)?,
            edited: doc.edited,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        })
    }
}
