//! # Auth Gate
//!
//! Resolves the caller identity from the request's `Authorization: Bearer`
//! header. Any failure (missing header, bad signature, expired token,
//! empty subject) means "no identity", which the pipeline rejects as
//! unauthenticated.

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use vault_core::{CallerIdentity, VaultError, VaultResult};

/// Resolves the authenticated caller of a request, if any.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Option<CallerIdentity>;
}

/// Type alias for a shared authenticator
pub type BoxedAuthenticator = Arc<dyn Authenticator>;

/// Claims carried by an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Caller uid
    pub sub: String,
    /// Expiry, seconds since epoch
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// HS256 identity tokens signed with a shared secret
#[derive(Clone)]
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a raw token and return its subject.
    pub fn verify(&self, token: &str) -> Option<CallerIdentity> {
        let data = jsonwebtoken::decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| debug!("Rejected identity token: {}", e))
            .ok()?;

        let uid = data.claims.sub.trim();
        if uid.is_empty() {
            return None;
        }
        Some(CallerIdentity::new(uid))
    }

    /// Sign an identity token for `uid`, valid for `ttl`.
    pub fn issue(&self, uid: &str, ttl: Duration) -> VaultResult<String> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: uid.to_string(),
            exp: (now + ttl).timestamp(),
            iat: Some(now.timestamp()),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| VaultError::Internal(format!("Failed to sign identity token: {}", e)))
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Option<CallerIdentity> {
        bearer_token(headers).and_then(|token| self.verify(token))
    }
}

/// Token part of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
