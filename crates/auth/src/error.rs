use thiserror::Error;

/// Failures of the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A user with this email already exists")]
    DuplicateEmail,

    #[error("User not found")]
    NotFound,

    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Failures while issuing or validating bearer tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token generation failed: {0}")]
    Generation(String),

    #[error("Token validation failed: {0}")]
    Invalid(String),

    #[error("Token expired")]
    Expired,
}

/// Outcome kinds of the user operations. Success is `Ok`.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Username must be 3-16 characters long and contain only letters, numbers, underscores (_), or hyphens (-)")]
    InvalidUsername,

    #[error("Password must be at least 8 characters and include a letter, a number and a special character (@$!%*?&)")]
    InvalidPassword,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("A user with this email already exists")]
    DuplicateEmail,

    #[error("A user with this email does not exist or the credentials are not correct")]
    NotFoundOrInvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error(transparent)]
    Storage(StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl UserError {
    /// Stable snake_case identifier surfaced to clients.
    pub fn code(&self) -> &'static str {
        match self {
            UserError::InvalidUsername => "invalid_username",
            UserError::InvalidPassword => "invalid_password",
            UserError::InvalidEmail => "invalid_email",
            UserError::DuplicateEmail => "duplicate_email",
            UserError::NotFoundOrInvalidCredentials => "not_found_or_invalid_credentials",
            UserError::NotFound => "not_found",
            UserError::Storage(_) => "storage_unavailable",
            UserError::Token(_) => "token_error",
        }
    }
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => UserError::DuplicateEmail,
            StoreError::NotFound => UserError::NotFound,
            other => UserError::Storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, UserError>;
