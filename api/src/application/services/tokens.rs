use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    expires_secs: i64,
}

impl JwtKeys {
    pub fn new(secret: impl Into<String>, expires_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            expires_secs,
        }
    }

    pub fn expires_secs(&self) -> i64 {
        self.expires_secs
    }

    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + self.expires_secs.max(0)) as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Subject of a valid, unexpired token.
    pub fn subject(&self, token: &str) -> Option<String> {
        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .ok()
        .map(|data| data.claims.sub)
        .filter(|sub| !sub.is_empty())
    }
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("secret", &"***")
            .field("expires_secs", &self.expires_secs)
            .finish()
    }
}

/// Opaque random token for verification and reset links.
pub fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
