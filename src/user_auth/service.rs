use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject: the account's phone number
    pub exp: usize,  // Expiration time (as UTC timestamp)
    #[serde(default)]
    pub iat: usize, // Issued at
}

/// Verifies bearer tokens. Issuing them belongs to the login service.
pub struct TokenService {
    decoding_key: DecodingKey,
    validation: Validation,
    #[cfg(test)]
    secret: Vec<u8>,
}

impl TokenService {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            #[cfg(test)]
            secret: jwt_secret.as_bytes().to_vec(),
        }
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    #[cfg(test)]
    pub fn issue_for_test(&self, subject: &str, ttl_secs: i64) -> String {
        use jsonwebtoken::{EncodingKey, Header, encode};

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + ttl_secs) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .expect("encode test token")
    }
}

/// Pull the raw token from `Authorization: Bearer …`, falling back to the
/// legacy `login` header used by older clients.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get("login")
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}
