use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// Issues and validates self-contained HS256 tokens. The signing key is
/// process-wide configuration; there is no server-side token state.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl JwtService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // A token must be rejected from the expiry instant, not some time after.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    pub fn issue(&self, username: &str, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: username.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Decodes and verifies a token. Malformed, tampered, and expired input
    /// all come back as `None`; nothing here panics on arbitrary strings.
    pub fn claims(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .ok()
            .map(|data| data.claims)
    }

    pub fn validate(&self, token: &str) -> bool {
        self.claims(token).is_some()
    }

    pub fn extract_username(&self, token: &str) -> Option<String> {
        self.claims(token).map(|claims| claims.sub)
    }

    pub fn extract_role(&self, token: &str) -> Option<Role> {
        self.claims(token).and_then(|claims| Role::parse(&claims.role))
    }
}
