//! HS256 bearer-token verification.
//!
//! The auth crate keeps signature concerns out of the domain; this is the
//! transport layer that decodes and verifies tokens into its claims model.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use stockroom_auth::{JwtClaims, Role, TokenValidationError, validate_claims};
use stockroom_core::UserId;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies HS256-signed bearer tokens.
pub struct Hs256TokenVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)?;
        // Deterministic claim checks on top of signature verification.
        validate_claims(&data.claims, Utc::now())?;
        Ok(data.claims)
    }
}

/// Mints HS256 tokens. The real deployment gets tokens from the identity
/// provider; this exists for dev tooling and the test suite.
pub struct Hs256TokenIssuer {
    encoding: EncodingKey,
}

impl Hs256TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
        }
    }

    pub fn issue(
        &self,
        user_id: UserId,
        role: Role,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id,
            role,
            iat: now,
            exp: now + ttl,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}
