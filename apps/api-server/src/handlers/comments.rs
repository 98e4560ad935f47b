//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use waypost_shared::dto::CreateCommentRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /posts/{post_id}/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .content
        .create_comment(identity.user_id, path.into_inner(), &body.content)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// GET /user/{user_id}/my-comments - posts the user commented on,
/// excluding the user's own posts.
pub async fn my_comments(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let posts = state.content.commented_posts(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(posts))
}
