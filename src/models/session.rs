//! Session model and the signed token that carries it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::principal::PrincipalKind;

/// Server-side session bound to exactly one (principal id, variant) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: String,
    pub principal_kind: PrincipalKind,
    pub principal_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// JWT claims carried by the client. Only meaningful while the referenced
/// session row exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub sid: String,
    pub principal_id: i64,
    pub kind: PrincipalKind,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: i64) -> SessionClaims {
        SessionClaims {
            sub: "ana@escola.br".to_string(),
            sid: "b5f1c2f0-0000-4000-8000-000000000000".to_string(),
            principal_id: 7,
            kind: PrincipalKind::Teacher,
            exp,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn token_round_trip() {
        let exp = Utc::now().timestamp() + 3600;
        let token = claims(exp).create_token("secret").unwrap();
        let parsed = SessionClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.principal_id, 7);
        assert_eq!(parsed.kind, PrincipalKind::Teacher);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let exp = Utc::now().timestamp() + 3600;
        let token = claims(exp).create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = claims(Utc::now().timestamp() - 3600).create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "secret").is_err());
    }
}
