pub mod policy;

pub use policy::{authorize, Access};

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Claims of the bearer tokens issued by the hosted auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    /// Fails when the lifetime does not fit a timestamp
    pub fn new(user_id: Uuid, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| JwtError::TokenGeneration(format!("token lifetime of {} hours is out of range", expiry_hours)))?
            .timestamp();

        Ok(Self {
            sub: user_id,
            exp,
            iat: now.timestamp(),
            aud: config::config().security.jwt_audience.clone(),
            email: None,
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn decode_token(token: &str, secret: &str, audience: Option<&str>) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

/// Signs with the configured secret
pub fn generate_jwt(claims: Claims) -> Result<String, JwtError> {
    encode_token(&claims, &config::config().security.jwt_secret)
}

/// Verifies against the configured secret and audience
pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let security = &config::config().security;
    decode_token(token, &security.jwt_secret, security.jwt_audience.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(hours: i64, aud: Option<&str>) -> Claims {
        let now = Utc::now();
        Claims {
            sub: Uuid::new_v4(),
            exp: (now + Duration::hours(hours)).timestamp(),
            iat: now.timestamp(),
            aud: aud.map(String::from),
            email: Some("mia@agency.example".into()),
        }
    }

    #[test]
    fn round_trips_claims() {
        let original = claims(1, None);
        let token = encode_token(&original, "secret").unwrap();
        let decoded = decode_token(&token, "secret", None).unwrap();
        assert_eq!(decoded.sub, original.sub);
        assert_eq!(decoded.email.as_deref(), Some("mia@agency.example"));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = encode_token(&claims(1, None), "secret").unwrap();
        assert!(matches!(decode_token(&token, "other", None), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let token = encode_token(&claims(-2, None), "secret").unwrap();
        assert!(decode_token(&token, "secret", None).is_err());
    }

    #[test]
    fn checks_audience_when_configured() {
        let token = encode_token(&claims(1, Some("authenticated")), "secret").unwrap();
        assert!(decode_token(&token, "secret", Some("authenticated")).is_ok());
        assert!(decode_token(&token, "secret", Some("service_role")).is_err());
    }

    #[test]
    fn lifetime_is_added_to_now() {
        let claims = Claims::new(Uuid::new_v4(), 24).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        for hours in [u64::MAX, i64::MAX as u64, 10_000_000_000_000_000] {
            assert!(matches!(Claims::new(Uuid::new_v4(), hours), Err(JwtError::TokenGeneration(_))), "{}", hours);
        }
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(encode_token(&claims(1, None), ""), Err(JwtError::InvalidSecret)));
    }
}
