use anyhow::Context;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::{RequestError, RequestResult};

pub const SESSION_EXPIRY_DURATION: time::Duration = time::Duration::days(31);
pub const REMEMBER_EXPIRY_DURATION: time::Duration = time::Duration::days(365);

/// Random bytes behind each generated token or username (hex-encoded: 64 chars).
const TOKEN_BYTES: usize = 32;

/// Contents of the signed session cookie.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default)]
    pub uid: Option<i64>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub fresh: bool,
    #[serde(default)]
    pub last_url: Option<String>,
    #[serde(default)]
    pub flashes: Vec<String>,
    pub exp: i64,
}

/// Contents of the long-lived remember-me cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RememberClaims {
    pub uid: i64,
    pub token: String,
    pub exp: i64,
}

/// HS256 keys derived from the configured secret.
#[derive(Clone)]
pub struct CookieKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl CookieKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn encode<T: Serialize>(&self, claims: &T) -> RequestResult<String> {
        Ok(jsonwebtoken::encode(
            &Header::default(),
            claims,
            &self.encoding,
        )?)
    }

    /// Tampered, expired or malformed cookies decode to `None`.
    pub fn decode<T: DeserializeOwned>(&self, value: &str) -> Option<T> {
        match jsonwebtoken::decode::<T>(value, &self.decoding, &Validation::default()) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid cookie");
                None
            }
        }
    }
}

pub fn expiry_after(duration: time::Duration) -> i64 {
    (OffsetDateTime::now_utc() + duration).unix_timestamp()
}

/// 64 hex characters from the thread-local CSPRNG.
pub fn random_token_hex() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

pub async fn hash_password_argon2(password: String) -> RequestResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")?
        .map_err(|e| RequestError::PasswordHash(e.to_string()))
}

pub async fn verify_password_argon2(password: String, hash: String) -> RequestResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("password verification task failed")?
        .map_err(|e| RequestError::PasswordHash(e.to_string()))
}
