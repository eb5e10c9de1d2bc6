//! JWT access tokens, password-reset tokens and refresh-token helpers.
//!
//! Access and reset tokens are HS256-signed JWTs sharing one secret. They
//! carry different claim sets, so neither decodes as the other. Refresh
//! tokens are opaque random strings; only their SHA-256 hash is stored.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use soundshelf_core::types::DbId;
use uuid::Uuid;

/// `purpose` claim carried by password-reset tokens.
pub const RESET_PURPOSE: &str = "password_reset";

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's role name (`"user"` or `"creator"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Claims of a password-reset token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResetClaims {
    pub sub: DbId,
    pub purpose: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token signing and session lifetime configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_token_expiry_mins: i64,
    /// Session lifetime in hours for a plain login.
    pub session_expiry_hours: i64,
    /// Session lifetime in days when the user asked to be remembered.
    pub remember_expiry_days: i64,
    /// Password-reset token lifetime in minutes.
    pub reset_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 24;
const DEFAULT_REMEMBER_EXPIRY_DAYS: i64 = 30;
const DEFAULT_RESET_EXPIRY_MINS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `SESSION_EXPIRY_HOURS`     | no       | `24`    |
    /// | `SESSION_REMEMBER_DAYS`    | no       | `30`    |
    /// | `RESET_TOKEN_EXPIRY_MINS`  | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty, or if a lifetime does
    /// not parse.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_i64("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS),
            session_expiry_hours: env_i64("SESSION_EXPIRY_HOURS", DEFAULT_SESSION_EXPIRY_HOURS),
            remember_expiry_days: env_i64("SESSION_REMEMBER_DAYS", DEFAULT_REMEMBER_EXPIRY_DAYS),
            reset_token_expiry_mins: env_i64("RESET_TOKEN_EXPIRY_MINS", DEFAULT_RESET_EXPIRY_MINS),
        }
    }

    /// How long a session opened now should live.
    pub fn session_lifetime(&self, remember: bool) -> chrono::Duration {
        if remember {
            chrono::Duration::days(self.remember_expiry_days)
        } else {
            chrono::Duration::hours(self.session_expiry_hours)
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .map(|raw| {
            raw.parse()
                .unwrap_or_else(|_| panic!("{name} must be a valid i64"))
        })
        .unwrap_or(default)
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Sign a password-reset token for `user_id`.
pub fn generate_reset_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = ResetClaims {
        sub: user_id,
        purpose: RESET_PURPOSE.to_string(),
        exp: now + config.reset_token_expiry_mins * 60,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Resolve a password-reset token to the user id it was issued for.
///
/// Every failure (bad signature, expired, malformed, wrong purpose) yields
/// `None`; callers cannot tell them apart.
pub fn verify_reset_token(token: &str, config: &JwtConfig) -> Option<DbId> {
    let claims = decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?
    .claims;

    (claims.purpose == RESET_PURPOSE).then_some(claims.sub)
}

/// Generate a random refresh token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext goes to the
/// client; only the hash is persisted.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a refresh token.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
