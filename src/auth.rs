use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
};

/// Name of the HTTP-only cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Session lifetime. The cookie max-age and the token `exp` claim both use
/// this value, so the cookie can never outlive a verifiable token or vice
/// versa.
pub const SESSION_TTL_DAYS: i64 = 3;

/// Role
///
/// Closed role enumeration carried inside the session token. Using an enum
/// instead of a free-form string removes the typo class of authorization
/// bugs: an unknown role fails token decoding outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Claims
///
/// Payload structure of the signed session token. Signed with the server
/// secret at login and validated on every authenticated request. Tokens are
/// stateless: logout only discards the client-held cookie, and an issued
/// token stays verifiable until `exp` (documented limitation, not a bug).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the UUID of the user.
    pub sub: Uuid,
    /// Role resolved at login time.
    pub role: Role,
    /// Issued At timestamp.
    pub iat: usize,
    /// Expiration timestamp; tokens past this point are rejected.
    pub exp: usize,
}

/// One-way, salted argon2 hash of a password. The salt is generated per
/// call, so equal passwords never share a hash.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored argon2 hash. A malformed stored
/// hash verifies as false rather than erroring; the caller only learns
/// match / no-match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Signs a session token for the given user with a 3-day expiry.
pub fn issue_token(secret: &str, user_id: Uuid, role: Role) -> Result<String, ApiError> {
    let now = Utc::now();
    let exp = now + chrono::Duration::days(SESSION_TTL_DAYS);

    let claims = Claims {
        sub: user_id,
        role,
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))
}

/// Decodes and validates a session token, including expiry.
/// Any failure (bad signature, malformed token, expired, unknown role)
/// collapses to the same stable 401 message.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| ApiError::Auth("Invalid token".to_string()))
}

/// Builds the HTTP-only session cookie for a freshly issued token.
///
/// `Secure` and `SameSite` depend on the deployment environment: the
/// production SPA is served from a different origin, so cross-site cookie
/// delivery needs `SameSite=None; Secure`; local development over plain
/// HTTP uses `Lax`.
pub fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    let production = config.env == Env::Production;
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Lax
        })
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Builds an expired, empty cookie that instructs the browser to drop the
/// session. Attribute flags must match the issuing cookie or the browser
/// keeps the original.
pub fn clear_session_cookie(config: &AppConfig) -> Cookie<'static> {
    let production = config.env == Env::Production;
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Lax
        })
        .max_age(time::Duration::ZERO)
        .build()
}

/// AuthUser Extractor Result
///
/// The resolved identity of an authenticated request: the token subject and
/// role, attached to the request context. Handlers take this as an argument
/// to receive a validated identity, keeping authentication separate from
/// business logic.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a
/// function argument in any authenticated handler.
///
/// The gate is pure and synchronous apart from the context attachment:
/// 1. Cookie extraction — no cookie means 401 "Not Authorized".
/// 2. Token decoding — bad signature or expired token means 401
///    "Invalid token".
/// 3. Success — identity and role attach to the request.
///
/// There is deliberately no per-request database lookup here; a deleted
/// user surfaces as NotFound from the profile endpoints instead.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| ApiError::Auth("Not Authorized".to_string()))?;

        let claims = decode_token(&config.jwt_secret, &token)?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// AdminUser Extractor
///
/// Identity wrapper for admin-only handlers: authentication first (same
/// rejection behavior as `AuthUser`), then a role check. A valid session
/// without the admin role is rejected with 403, never 401 — the caller is
/// known, just not allowed.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            return Err(ApiError::Forbidden("Admins only access".to_string()));
        }

        Ok(AdminUser(user))
    }
}
