use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[cfg(test)]
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

pub(crate) const ADMIN_ROLE: &str = "admin";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) role: String,
    pub(crate) exp: i64,
}

impl Claims {
    pub(crate) fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(ADMIN_ROLE)
    }
}

pub(crate) struct JwtService {
    secret: String,
}

impl JwtService {
    pub(crate) fn new(secret: &str) -> Self {
        JwtService {
            secret: secret.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn generate_token(
        &self,
        email: &str,
        role: &str,
        ttl_seconds: i64,
    ) -> Result<String, JwtError> {
        use chrono::{Duration, Utc};
        use jsonwebtoken::{EncodingKey, Header, encode};

        let claims = Claims {
            email: email.into(),
            role: role.into(),
            exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        Ok(token_data.claims)
    }
}
