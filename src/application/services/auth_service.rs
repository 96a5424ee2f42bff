//! Admin authentication, session tokens and per-resource password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Identity carried by every admin session token.
pub const ADMIN_SUBJECT: &str = "admin";

/// Default session lifetime in hours.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Session lifetime in days when the caller asks to be remembered.
pub const REMEMBER_ME_TTL_DAYS: i64 = 30;

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Stateless credential service keyed by the configured admin secret.
///
/// Built even when the secret is missing; every operation that needs it then
/// fails with a server error instead of granting or denying access.
#[derive(Clone)]
pub struct AuthService {
    secret: Option<String>,
    validation: Validation,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(secret: Option<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            secret: secret.filter(|s| !s.is_empty()),
            validation,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&str, AppError> {
        self.secret.as_deref().ok_or_else(|| {
            tracing::error!("ADMIN_SECRET is not configured; refusing admin operation");
            AppError::internal(
                "Server configuration error",
                json!({ "reason": "admin secret not configured" }),
            )
        })
    }

    /// Compares a caller-supplied secret with the configured one in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no secret is configured.
    pub fn authenticate_admin(&self, candidate: &str) -> Result<bool, AppError> {
        let secret = self.secret()?;
        Ok(bool::from(secret.as_bytes().ct_eq(candidate.as_bytes())))
    }

    /// Issues a signed session token valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no secret is configured or signing fails.
    pub fn issue_session_token(&self, ttl: Duration) -> Result<String, AppError> {
        let secret = self.secret()?;
        let now = Utc::now();
        let claims = SessionClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| {
            AppError::internal(
                "Failed to issue session token",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    /// Verifies a session token and returns its claims.
    ///
    /// # Errors
    ///
    /// Expired, tampered and malformed tokens all return
    /// [`AppError::authentication_required`]. Returns [`AppError::Internal`]
    /// if no secret is configured.
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        let secret = self.secret()?;

        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &self.validation,
        )
        .map_err(|e| {
            tracing::debug!(kind = ?e.kind(), "Session token rejected");
            AppError::authentication_required()
        })?;

        if data.claims.sub != ADMIN_SUBJECT {
            return Err(AppError::authentication_required());
        }

        Ok(data.claims)
    }

    /// Authorizes an admin request from whichever credentials it carried.
    ///
    /// A bearer value equal to the admin secret or a valid session token is
    /// accepted. Anything else yields the same 401.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no secret is configured, before
    /// looking at any credential.
    pub fn authorize(&self, bearer: Option<&str>, session: Option<&str>) -> Result<(), AppError> {
        self.secret()?;

        if let Some(candidate) = bearer
            && self.authenticate_admin(candidate)?
        {
            return Ok(());
        }

        if let Some(token) = session
            && self.verify_session_token(token).is_ok()
        {
            return Ok(());
        }

        Err(AppError::authentication_required())
    }

    /// Lifetime of a session given the `rememberMe` flag.
    pub fn session_ttl(remember_me: bool) -> Duration {
        if remember_me {
            Duration::days(REMEMBER_ME_TTL_DAYS)
        } else {
            Duration::hours(SESSION_TTL_HOURS)
        }
    }
}

/// Hashes a plaintext password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            AppError::internal(
                "Password hashing failed",
                json!({ "reason": e.to_string() }),
            )
        })?;

    Ok(hash.to_string())
}

/// Verifies a plaintext password against a stored Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the stored hash is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        AppError::internal(
            "Invalid password hash format",
            json!({ "reason": e.to_string() }),
        )
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::internal(
            "Password verification failed",
            json!({ "reason": e.to_string() }),
        )),
    }
}

/// [`hash_password`] on the blocking pool, off the async workers.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails or the task panics.
pub async fn hash_password_in_background(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            AppError::internal("Password hashing failed", json!({ "reason": e.to_string() }))
        })?
}

/// [`verify_password`] on the blocking pool, off the async workers.
///
/// # Errors
///
/// As [`verify_password`], plus [`AppError::Internal`] if the task panics.
pub async fn verify_password_in_background(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| {
            AppError::internal(
                "Password verification failed",
                json!({ "reason": e.to_string() }),
            )
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn service() -> AuthService {
        AuthService::new(Some("top-secret".to_string()))
    }

    #[test]
    fn test_authenticate_admin() {
        let auth = service();
        assert!(auth.authenticate_admin("top-secret").unwrap());
        assert!(!auth.authenticate_admin("top-secreT").unwrap());
        assert!(!auth.authenticate_admin("").unwrap());
    }

    #[test]
    fn test_missing_secret_fails_closed() {
        let auth = AuthService::new(None);

        assert!(!auth.is_configured());
        assert_eq!(
            auth.authenticate_admin("anything").unwrap_err().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            auth.authorize(Some("anything"), None).unwrap_err().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(auth.issue_session_token(AuthService::session_ttl(false)).is_err());
    }

    #[test]
    fn test_empty_secret_counts_as_missing() {
        assert!(!AuthService::new(Some(String::new())).is_configured());
    }

    #[test]
    fn test_session_token_roundtrip() {
        let auth = service();
        let token = auth.issue_session_token(AuthService::session_ttl(false)).unwrap();

        let claims = auth.verify_session_token(&token).unwrap();

        assert_eq!(claims.sub, ADMIN_SUBJECT);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_and_garbage_tokens_collapse() {
        let auth = service();
        let expired = auth.issue_session_token(Duration::seconds(-120)).unwrap();

        let expired_err = auth.verify_session_token(&expired).unwrap_err();
        let garbage_err = auth.verify_session_token("not.a.jwt").unwrap_err();

        assert_eq!(expired_err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired_err.message(), garbage_err.message());
        assert_eq!(expired_err.status(), garbage_err.status());
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let other = AuthService::new(Some("other-secret".to_string()));
        let token = other.issue_session_token(AuthService::session_ttl(false)).unwrap();

        assert!(service().verify_session_token(&token).is_err());
    }

    #[test]
    fn test_authorize_accepts_bearer_or_session() {
        let auth = service();
        let token = auth.issue_session_token(AuthService::session_ttl(false)).unwrap();

        assert!(auth.authorize(Some("top-secret"), None).is_ok());
        assert!(auth.authorize(None, Some(&token)).is_ok());
        assert!(auth.authorize(Some("wrong"), Some(&token)).is_ok());

        let err = auth.authorize(Some("wrong"), Some("garbage")).unwrap_err();
        assert_eq!(err.message(), "Authentication required.");
        assert!(auth.authorize(None, None).is_err());
    }

    #[test]
    fn test_session_ttl() {
        assert_eq!(AuthService::session_ttl(false), Duration::hours(24));
        assert_eq!(AuthService::session_ttl(true), Duration::days(30));
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("secret").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret", &hash).unwrap());
        assert!(!verify_password("Secret", &hash).unwrap());
    }

    #[test]
    fn test_password_hashes_are_salted() {
        assert_ne!(hash_password("x").unwrap(), hash_password("x").unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn test_background_hash_and_verify() {
        let hash = hash_password_in_background("secret").await.unwrap();

        assert!(verify_password_in_background("secret", &hash).await.unwrap());
        assert!(!verify_password_in_background("guess", &hash).await.unwrap());
    }
}
