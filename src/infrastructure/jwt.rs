use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::identity::{Principal, Role};
use crate::domain::ports::IdentityVerifier;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: Uuid,
    role: Role,
    exp: i64,
}

/// HS256 session tokens carrying `{id, role, exp}`.
pub struct JwtVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue(&self, subject_id: Uuid, role: Role, ttl: Duration) -> Result<String, DomainError> {
        let claims = Claims {
            id: subject_id,
            role,
            exp: (Utc::now() + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| DomainError::Internal(format!("token signing failed: {e}")))
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, credential: &str) -> Result<Principal, DomainError> {
        let data = decode::<Claims>(credential, &self.decoding, &self.validation)
            .map_err(|_| DomainError::Unauthorized("Invalid token.".into()))?;
        Ok(Principal::new(data.claims.id, data.claims.role))
    }
}
