//! Account handlers: registration, login, profile maintenance.

use std::sync::Arc;

use actix_web::{
    HttpResponse,
    cookie::{Cookie, time::Duration},
    web,
};

use waypost_core::domain::User;
use waypost_core::ports::TokenService;
use waypost_shared::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, SignupRequest,
    UpdateAvatarRequest, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn public_view(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        avatar: user.avatar.clone(),
    }
}

fn token_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build("token", token)
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// POST /signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    state
        .accounts
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let (user, token) = state.accounts.login(&req.email, &req.password).await?;

    let cookie = token_cookie(token.clone(), token_service.expiration_seconds());
    Ok(HttpResponse::Ok().cookie(cookie).json(AuthResponse {
        message: "You are logged in successfully!".to_string(),
        user: Some(public_view(&user)),
        token: Some(token),
    }))
}

/// POST /logout - clears the token cookie.
pub async fn logout() -> HttpResponse {
    let expired = token_cookie(String::new(), 0);
    HttpResponse::Ok().cookie(expired).json(AuthResponse {
        message: "You are logged out successfully!".to_string(),
        user: None,
        token: None,
    })
}

/// GET /profile - the caller's own record, password digest excluded.
pub async fn profile(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.profile(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(public_view(&user)))
}

/// POST /changePassword
pub async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    state
        .accounts
        .change_password(identity.user_id, &req.old_password, &req.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password changed successfully!".to_string(),
    }))
}

/// PUT /profile/update-avatar
pub async fn update_avatar(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateAvatarRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .accounts
        .update_avatar(identity.user_id, &body.avatar)
        .await?;

    Ok(HttpResponse::Ok().json(public_view(&user)))
}
