use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Which collection a principal was authenticated against. Users and
/// admins are disjoint; a token minted for one never authorizes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Admin,
}

/// The claim set bound into a token at issuance. Carries only non-secret
/// attributes; never the credential hash or plaintext secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal ID)
    pub sub: String,
    /// Principal kind (user or admin)
    pub kind: PrincipalKind,
    /// Display name
    pub name: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Build a claim set issued at `issued_at`, expiring `ttl_seconds` later.
    ///
    /// The issuance instant is the caller's clock reading, so the same
    /// claims at the same instant under the same key encode to the same
    /// token.
    pub fn new(
        subject: String,
        kind: PrincipalKind,
        name: String,
        issued_at: DateTime<Utc>,
        ttl_seconds: i64,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject,
            kind,
            name,
            iat,
            exp: iat + ttl_seconds,
        }
    }

    /// A token is live through `exp` inclusive and expired after it.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// Sign a claim set into a bearer token (HS256).
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Validate a token's signature and structure, then its expiry against the
/// caller's clock reading.
///
/// Tampered, re-signed, or structurally broken tokens are `TokenInvalid`;
/// a well-signed token past its expiry is `TokenExpired`. The two are kept
/// distinct so callers can report "session expired" separately.
pub fn verify_token(token: &str, secret: &str, now: DateTime<Utc>) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against the supplied clock, not the system's.
    validation.validate_exp = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::TokenInvalid)?;

    if data.claims.expired_at(now) {
        return Err(AuthError::TokenExpired);
    }

    Ok(data.claims)
}
