use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    error::{Result, StoreError, TokenError, UserError},
    jwt::{Claims, TokenIssuer},
    model::{NewUser, ProfileUpdate, UserRecord, UserView},
    password::{encode_salt, generate_salt, hash_password, verify_password},
    store::CredentialStore,
    validation::validate_fields,
};

/// Registration, login, lookup and profile changes over a [`CredentialStore`]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    /// Create a new AuthService
    ///
    /// # Arguments
    /// * `store` - Where user records live
    /// * `tokens` - Signs the bearer tokens handed out on login
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    /// Register a new user
    ///
    /// # Arguments
    /// * `username` - 3-16 letters, digits, `_` or `-`
    /// * `password` - Plain text password (will be salted and hashed)
    /// * `email` - Must not belong to another account
    pub async fn register(&self, username: &str, password: &str, email: &str) -> Result<UserView> {
        validate_fields(username, password, email)?;

        if self.store.find_by_email(email).await?.is_some() {
            return Err(UserError::DuplicateEmail);
        }

        let salt = generate_salt();
        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password, &salt),
            salt: encode_salt(&salt),
        };

        // The unique constraint catches a concurrent registration that slipped past the lookup.
        let record = self.store.insert(new_user).await?;

        info!(user_id = record.id, username = %record.username, "user registered");
        Ok(record.into())
    }

    /// Check credentials and issue a bearer token
    ///
    /// A missing account and a wrong password produce the same error.
    pub async fn login(&self, username: &str, password: &str, email: &str) -> Result<(String, UserView)> {
        let record = self.authenticate(email, username, password).await?;
        let token = self.tokens.issue(&record.username)?;

        info!(user_id = record.id, username = %record.username, "user logged in");
        Ok((token, record.into()))
    }

    /// Look up a user by email
    pub async fn get_user(&self, email: &str) -> Result<UserView> {
        self.store
            .find_by_email(email)
            .await?
            .map(UserView::from)
            .ok_or(UserError::NotFound)
    }

    /// Move an account to a new email address
    ///
    /// # Arguments
    /// * `current_email` - Email the account is registered under
    /// * `profile` - Username and password of the account, plus the new email
    pub async fn modify_user(&self, current_email: &str, profile: &ProfileUpdate) -> Result<()> {
        if let Some(existing) = self.store.find_by_email(&profile.email).await? {
            if existing.email != current_email {
                return Err(UserError::DuplicateEmail);
            }
        }

        let record = self
            .authenticate(current_email, &profile.username, &profile.password)
            .await?;

        validate_fields(&profile.username, &profile.password, &profile.email)?;

        // The account can vanish between authenticate and the update
        self.store
            .update_email(current_email, &profile.email)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => UserError::NotFoundOrInvalidCredentials,
                other => other.into(),
            })?;

        info!(user_id = record.id, "user email changed");
        Ok(())
    }

    /// Validate a bearer token and return its claims
    pub fn validate_token(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        self.tokens.validate(token)
    }

    async fn authenticate(&self, email: &str, username: &str, password: &str) -> Result<UserRecord> {
        let record = self
            .store
            .find_by_email_and_username(email, username)
            .await?
            .ok_or_else(|| {
                warn!(username, "login attempt for unknown account");
                UserError::NotFoundOrInvalidCredentials
            })?;

        if !verify_password(password, &record.password_hash, &record.salt) {
            warn!(user_id = record.id, "password mismatch");
            return Err(UserError::NotFoundOrInvalidCredentials);
        }

        Ok(record)
    }
}
