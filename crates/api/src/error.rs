use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use auth::UserError;
use storage::FileError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            error: error.into(),
        }
    }
}

/// Everything a handler can fail with, mapped 1:1 to status and message
#[derive(Debug)]
pub enum ApiError {
    User(UserError),
    File(FileError),
    Unauthorized(String),
    /// Request body could not be parsed into the expected shape
    BadRequest(String),
    /// Multipart stream was malformed or exceeded the body limit
    Multipart(MultipartError),
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        ApiError::User(err)
    }
}

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        ApiError::File(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

fn multipart_code(status: StatusCode) -> &'static str {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        "payload_too_large"
    } else {
        "invalid_multipart"
    }
}

fn user_status(err: &UserError) -> StatusCode {
    match err {
        UserError::InvalidUsername
        | UserError::InvalidPassword
        | UserError::InvalidEmail
        | UserError::DuplicateEmail
        | UserError::NotFoundOrInvalidCredentials => StatusCode::BAD_REQUEST,
        UserError::NotFound => StatusCode::NOT_FOUND,
        UserError::Storage(_) | UserError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn file_status(err: &FileError) -> StatusCode {
    match err {
        FileError::NotProvided | FileError::InvalidName(_) => StatusCode::BAD_REQUEST,
        FileError::NotFound(_) => StatusCode::NOT_FOUND,
        FileError::Io(_) | FileError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::User(err) => (user_status(err), ErrorResponse::new(err.code(), err.to_string())),
            ApiError::File(err) => (file_status(err), ErrorResponse::new(err.code(), err.to_string())),
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("unauthorized", msg.clone()),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("invalid_request", msg.clone()),
            ),
            ApiError::Multipart(err) => {
                let status = err.status();
                (status, ErrorResponse::new(multipart_code(status), err.body_text()))
            }
        };

        if status.is_server_error() {
            tracing::error!(code = %body.code, error = %body.error, "request failed");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_statuses() {
        assert_eq!(user_status(&UserError::InvalidPassword), StatusCode::BAD_REQUEST);
        assert_eq!(user_status(&UserError::DuplicateEmail), StatusCode::BAD_REQUEST);
        assert_eq!(
            user_status(&UserError::NotFoundOrInvalidCredentials),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(user_status(&UserError::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_file_error_statuses() {
        assert_eq!(file_status(&FileError::NotProvided), StatusCode::BAD_REQUEST);
        assert_eq!(
            file_status(&FileError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            file_status(&FileError::Io(std::io::Error::other("disk"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_multipart_codes() {
        assert_eq!(multipart_code(StatusCode::PAYLOAD_TOO_LARGE), "payload_too_large");
        assert_eq!(multipart_code(StatusCode::BAD_REQUEST), "invalid_multipart");
    }

    #[test]
    fn test_bad_request_response() {
        let response = ApiError::BadRequest("missing field `email`".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_response() {
        let response = ApiError::Unauthorized("Missing token".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
