/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * Tokens are HS256-signed, carry the user ID as `sub`, and expire after the
 * configured number of days.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Why a token was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

/// Issues and verifies bearer tokens with one secret
///
/// Built once at start-up and shared through `AppState`.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// # Arguments
    /// * `secret` - HS256 signing secret
    /// * `ttl_days` - Token lifetime in days
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Create a token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        self.encode_claims(&claims)
    }

    /// Sign arbitrary claims with this issuer's key
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }

    /// Verify a token and return the user ID it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Invalid)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", 7)
    }

    #[test]
    fn test_issue_and_verify() {
        let user_id = Uuid::new_v4();
        let token = issuer().issue(user_id).unwrap();
        assert!(!token.is_empty());
        assert_eq!(issuer().verify(&token), Ok(user_id));
    }

    #[test]
    fn test_verify_invalid_token() {
        assert_eq!(issuer().verify("invalid.token.here"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = TokenIssuer::new("other-secret", 7).issue(Uuid::new_v4()).unwrap();
        assert_eq!(issuer().verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = issuer().encode_claims(&claims).unwrap();
        assert_eq!(issuer().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_non_uuid_subject_is_invalid() {
        let now = Utc::now().timestamp();
        let claims = Claims { sub: "alice".into(), exp: now + 60, iat: now };
        let token = issuer().encode_claims(&claims).unwrap();
        assert_eq!(issuer().verify(&token), Err(TokenError::Invalid));
    }
}
