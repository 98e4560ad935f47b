//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to change the caller's password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Request to set the caller's avatar reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvatarRequest {
    pub avatar: String,
}

/// Request to create a geotagged post. `location` is a raw
/// `[longitude, latitude]` pair, validated server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub description: String,
    pub location: Vec<f64>,
}

/// Request to edit a post; absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Request to comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// Query parameters for the nearby-posts feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedQuery {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub page: Option<i64>,
}

/// A user's public information; never carries the password digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Response to a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: Option<UserResponse>,
    pub token: Option<String>,
}

/// Bare acknowledgement with a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
