//! Shared-secret bearer tokens and the login credential table.
//!
//! A token is `base64url(claims) "." base64url(mac)` where the MAC is a
//! BLAKE3 keyed hash of the encoded claims under a key derived from the
//! configured secret.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const KEY_CONTEXT: &str = "vinha 2024 access token signing key";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization Header")]
    MissingHeader,

    #[error("Bad Authorization header. Expected 'Authorization: Bearer <token>'")]
    BadHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Signature verification failed")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("invalid user entry '{0}' (expected name:password)")]
    BadUserEntry(String),

    #[error("token encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenSigner {
    key: [u8; 32],
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        TokenSigner {
            key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&payload).as_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;
        let signature: [u8; 32] = signature
            .as_slice()
            .try_into()
            .map_err(|_| AuthError::InvalidToken)?;
        // blake3::Hash equality is constant-time.
        if self.mac(payload) != blake3::Hash::from(signature) {
            return Err(AuthError::BadSignature);
        }

        let claims: Claims = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(AuthError::InvalidToken)?;
        if now.timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }

    /// Extract and verify the token of an `Authorization: Bearer ...` header.
    pub fn authorize(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::BadHeader)?;
        self.verify(token)
    }

    fn mac(&self, payload: &str) -> blake3::Hash {
        blake3::keyed_hash(&self.key, payload.as_bytes())
    }
}

/// Fixed in-memory table of users allowed to log in.
#[derive(Debug, Default, Clone)]
pub struct Credentials(HashMap<String, String>);

impl Credentials {
    /// Parse `name:password` entries. The password may itself contain ':'.
    pub fn parse(entries: &[String]) -> Result<Self, AuthError> {
        let mut users = HashMap::new();
        for entry in entries {
            match entry.split_once(':') {
                Some((name, password)) if !name.is_empty() && !password.is_empty() => {
                    users.insert(name.to_string(), password.to_string());
                }
                _ => return Err(AuthError::BadUserEntry(entry.clone())),
            }
        }
        Ok(Credentials(users))
    }

    pub fn check(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.0.get(username) {
            Some(expected) if expected == password => Ok(()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
