//! Bearer-token minting and verification.

use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: Uuid,
    /// Issued-at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Tokens stay valid for 30 days.
const TOKEN_TTL_DAYS: i64 = 30;

/// Signs and verifies bearer tokens with a server secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
        }
    }

    /// Mint a token for a user.
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::new(secret.to_string()))
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service("test_secret_key");
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = service("test_secret_key");
        assert!(tokens.verify("not_a_token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let minting = service("secret1");
        let verifying = service("secret2");

        let token = minting.issue(Uuid::new_v4()).unwrap();
        assert!(verifying.verify(&token).is_err());
    }

    #[test]
    fn test_expiry_is_thirty_days_out() {
        let tokens = service("test_secret_key");
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        let claims = tokens.verify(&token).unwrap();

        let lifetime = claims.exp - chrono::Utc::now().timestamp();
        assert!(lifetime > 29 * 24 * 3600);
        assert!(lifetime <= 30 * 24 * 3600);
    }
}
