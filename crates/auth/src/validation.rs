use regex::Regex;
use std::sync::LazyLock;

use crate::error::UserError;

/// Characters accepted as the mandatory password symbol.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,16}$").expect("valid username pattern"));

static PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\d@$!%*?&]{8,}$").expect("valid password pattern"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// At least 8 characters from letters, digits and [`PASSWORD_SPECIALS`], with one of each class.
pub fn is_valid_password(password: &str) -> bool {
    PASSWORD_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check the three fields in order (username, password, email) and report the first failure.
pub fn validate_fields(username: &str, password: &str, email: &str) -> Result<(), UserError> {
    if !is_valid_username(username) {
        return Err(UserError::InvalidUsername);
    }
    if !is_valid_password(password) {
        return Err(UserError::InvalidPassword);
    }
    if !is_valid_email(email) {
        return Err(UserError::InvalidEmail);
    }
    Ok(())
}
