use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;
use storage::FileLog;

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub filename: Option<String>,
}

/// POST /api/file/upload - multipart form with a `file` field
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let mut file_name: Option<String> = None;
    let mut file_data: Vec<u8> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        file_name = field.file_name().map(|s| s.to_string());
        file_data = field.bytes().await?.to_vec();
    }

    state
        .file_manager
        .upload(file_name.as_deref(), &file_data)
        .await?;

    tracing::debug!(user = %claims.sub, "upload accepted");
    Ok(StatusCode::OK)
}

/// GET /api/file/download?filename=
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state
        .file_manager
        .download(query.filename.as_deref())
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );

    // download() succeeded, so the name is present and a plain path component
    let filename = query.filename.unwrap_or_default();
    let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', ""));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((StatusCode::OK, headers, data))
}

/// GET /api/file/delete?filename=
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<StatusCode, ApiError> {
    state
        .file_manager
        .delete(query.filename.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/file/logs
pub async fn get_logs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<FileLog>>, ApiError> {
    let logs = state.file_manager.logs().await?;
    Ok(Json(logs))
}
