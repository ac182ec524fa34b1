use chrono::{TimeDelta, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Signs and verifies bearer tokens for one issuer/audience pair.
#[derive(Clone)]
pub struct TokenIssuer {
    issuer: String,
    audience: String,
    secret: String,
    expiry_seconds: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiry_seconds", &self.expiry_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// # Arguments
    /// * `issuer` - Value of the `iss` claim
    /// * `audience` - Value of the `aud` claim
    /// * `secret` - HMAC signing key
    /// * `expiry_seconds` - Token lifetime in seconds (e.g., 3600 for 1 hour)
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        secret: impl Into<String>,
        expiry_seconds: i64,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            secret: secret.into(),
            expiry_seconds,
        }
    }

    pub fn from_config(config: &filekeep_core::AuthConfig) -> Self {
        Self::new(
            &config.issuer,
            &config.audience,
            &config.jwt_secret,
            config.token_expiry_seconds,
        )
    }

    fn claims_for(&self, username: &str) -> Result<Claims, TokenError> {
        let now = Utc::now();
        let expiration = TimeDelta::try_seconds(self.expiry_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                TokenError::Generation(format!(
                    "token lifetime of {} seconds is out of range",
                    self.expiry_seconds
                ))
            })?;

        Ok(Claims {
            sub: username.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Generate an HS512 token with the username as subject
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        encode(
            &Header::new(Algorithm::HS512),
            &self.claims_for(username)?,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Check signature, issuer, audience and expiry, and return the claims
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        })?;

        let claims = token_data.claims;
        if claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("filekeep", "filekeep-clients", "test_secret", 3600)
    }

    #[test]
    fn test_token_generation_and_validation() {
        let issuer = issuer();

        let token = issuer.issue("alice_99").unwrap();
        let claims = issuer.validate(&token).unwrap();

        assert_eq!(claims.sub, "alice_99");
        assert_eq!(claims.iss, "filekeep");
        assert_eq!(claims.aud, "filekeep-clients");
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_invalid_secret() {
        let token = issuer().issue("alice_99").unwrap();
        let other = TokenIssuer::new("filekeep", "filekeep-clients", "wrong_secret", 3600);

        assert!(matches!(other.validate(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_issuer_or_audience() {
        let token = issuer().issue("alice_99").unwrap();

        let other_issuer = TokenIssuer::new("someone-else", "filekeep-clients", "test_secret", 3600);
        assert!(other_issuer.validate(&token).is_err());

        let other_audience = TokenIssuer::new("filekeep", "another-app", "test_secret", 3600);
        assert!(other_audience.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let expired = TokenIssuer::new("filekeep", "filekeep-clients", "test_secret", -10);
        let token = expired.issue("alice_99").unwrap();

        assert!(matches!(expired.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        for expiry in [i64::MAX, i64::MIN] {
            let broken = TokenIssuer::new("filekeep", "filekeep-clients", "test_secret", expiry);
            assert!(matches!(broken.issue("alice_99"), Err(TokenError::Generation(_))));
        }
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(issuer().validate("not.a.jwt"), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", issuer());
        assert!(!rendered.contains("test_secret"));
    }
}
