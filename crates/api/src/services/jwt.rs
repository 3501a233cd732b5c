//! Access-token minting and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and email, valid for 24 hours.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bramble_core::UserId;

use crate::models::User;

/// Token lifetime in hours.
const TOKEN_TTL_HOURS: i64 = 24;

/// Errors that can occur when minting or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),

    /// The token is malformed, has a bad signature, or has expired.
    #[error("invalid token")]
    Invalid,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user.
    pub user_id: UserId,
    /// User's email at mint time.
    pub email: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Mints and verifies access tokens with a shared HS256 secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Mint an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Sign` if serialization or signing fails.
    pub fn mint(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user.id,
            email: user.email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a malformed, tampered, or expired
    /// token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bramble_core::Email;

    fn secret() -> SecretString {
        SecretString::from("fMh2kP9qRw7tYx4zAb6cDe8fGh1jKl3n")
    }

    fn test_user() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(7),
            email: Email::parse("user@example.com").unwrap(),
            hashed_password: "irrelevant".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_mint_verify_roundtrip() {
        let tokens = TokenService::new(&secret());
        let token = tokens.mint(&test_user()).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id, UserId::new(7));
        assert_eq!(claims.email, "user@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let tokens = TokenService::new(&secret());
        let token = tokens.mint(&test_user()).unwrap();

        let other = TokenService::new(&SecretString::from("nW4vBq8sLm2dXc6gJh9kRt1yPe5uZa3f"));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = TokenService::new(&secret());
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_expired_rejected() {
        let tokens = TokenService::new(&secret());
        // Beyond the default 60s validation leeway
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            user_id: UserId::new(7),
            email: "user@example.com".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(5)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding).unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid)));
    }
}
