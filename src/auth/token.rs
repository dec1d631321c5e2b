use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// Claims encoded within an issued bearer token.
///
/// The role is deliberately absent: admin checks always re-read the user
/// record so role changes take effect without re-login.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: i64,
    /// Issuance timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Why a token failed verification.
///
/// The HTTP boundary collapses both variants into a single 401, but the
/// distinction is kept here so the failure mode stays observable in tests.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Signature valid, but the current time is at or past `exp`.
    Expired,
    /// Bad signature, malformed payload, or missing claims.
    Invalid,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Expired => write!(f, "token expired"),
            TokenError::Invalid => write!(f, "invalid token"),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> AppError {
        // Expired and invalid tokens are indistinguishable to the client.
        AppError::Unauthorized("invalid or expired token".into())
    }
}

/// Issues and verifies signed, time-limited bearer tokens.
///
/// The HMAC keys are derived from the configured secret exactly once, at
/// construction; nothing here reads the environment per call. Verification
/// is stateless, so validity is recomputed on every request and there is no
/// server-side token record to revoke.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: i64,
}

impl TokenManager {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours,
        }
    }

    /// Issues a token for the given user, expiring a fixed TTL from now.
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::hours(self.ttl_hours))
            .ok_or_else(|| AppError::Internal("token expiry out of range".into()))?;

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token string and decodes its claims.
    ///
    /// Fails with `TokenError::Expired` when the signature checks out but the
    /// token is past its expiry, and `TokenError::Invalid` for everything
    /// else (bad signature, malformed payload, missing claims).
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
