use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{file_handlers, middleware as auth_middleware, user_handlers, AppState};

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/user/register", post(user_handlers::register))
        .route("/user/login", post(user_handlers::login));

    // Protected user routes (require a bearer token)
    let user_routes = Router::new()
        .route("/user/{email}", get(user_handlers::get_user))
        .route("/user/modify/{email}", put(user_handlers::modify_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    // Protected file routes (require a bearer token)
    let file_routes = Router::new()
        .route("/file/upload", post(file_handlers::upload_file))
        .route("/file/download", get(file_handlers::download_file))
        .route("/file/delete", get(file_handlers::delete_file))
        .route("/file/logs", get(file_handlers::get_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    let api = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(file_routes);

    Router::new()
        .route("/", get(|| async { "filekeep API running" }))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
