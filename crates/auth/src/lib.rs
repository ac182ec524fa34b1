// Credential primitives
mod error;
mod jwt;
mod password;
mod validation;

// Persistence and orchestration
pub mod model;
pub mod service;
pub mod store;

pub use error::{Result, StoreError, TokenError, UserError};

pub use jwt::{Claims, TokenIssuer};
pub use password::{decode_salt, encode_salt, generate_salt, hash_password, verify_password, SALT_LEN};
pub use validation::{is_valid_email, is_valid_password, is_valid_username, validate_fields, PASSWORD_SPECIALS};

pub use model::{NewUser, ProfileUpdate, UserRecord, UserView};
pub use service::AuthService;
pub use store::{CredentialStore, SqliteCredentialStore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AuthService, Claims, CredentialStore, ProfileUpdate, Result, SqliteCredentialStore,
        TokenIssuer, UserError, UserView,
    };
}
