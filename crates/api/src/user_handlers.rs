use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;
use auth::{ProfileUpdate, UserView};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserView,
    pub token: String,
}

/// POST /api/user/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let user = state
        .auth_service
        .register(&payload.username, &payload.password, &payload.email)
        .await?;

    let location = format!("/api/user/{}", user.email);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

/// POST /api/user/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;
    let (token, user) = state
        .auth_service
        .login(&payload.username, &payload.password, &payload.email)
        .await?;

    Ok(Json(LoginResponse { user, token }))
}

/// GET /api/user/{email}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let user = state.auth_service.get_user(&email).await?;
    Ok(Json(user))
}

/// PUT /api/user/modify/{email} - body carries the credentials and the new email
pub async fn modify_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;
    state.auth_service.modify_user(&email, &payload).await?;
    Ok(StatusCode::NO_CONTENT)
}
