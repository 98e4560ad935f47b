//! Post handlers: creation, listings, the nearby feed, edit and delete.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use waypost_core::domain::GeoPoint;
use waypost_shared::dto::{CreatePostRequest, FeedQuery, MessageResponse, UpdatePostRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /createPost
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let location = GeoPoint::from_coordinates(&req.location)?;

    let post = state
        .content
        .create_post(identity.user_id, &req.title, &req.description, location)
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /posts - paginated nearby feed, excluding the caller's posts.
pub async fn feed(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1);
    let posts = state
        .feed
        .nearby(identity.user_id, query.longitude, query.latitude, page)
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{post_id} - public fetch of one post with comments.
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.content.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /posts/{post_id} - edit own post.
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .content
        .update_post(
            identity.user_id,
            path.into_inner(),
            req.title.as_deref(),
            req.description.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{post_id} - delete own post, cascading its comments.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .content
        .delete_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Post deleted successfully".to_string(),
    }))
}

/// GET /user/{user_id}/my-posts - a user's own posts with comments.
pub async fn my_posts(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let posts = state.content.posts_by_author(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(posts))
}
