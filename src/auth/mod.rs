//! Admin authentication
//!
//! A single admin credential is checked against an argon2 PHC hash; a
//! successful login mints an opaque bearer token held in memory until it
//! expires or is signed out. Tokens do not survive a restart.

pub mod extractor;

pub use extractor::AdminSession;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hash error: {0}")]
    BadHash(String),
}

pub struct AuthService {
    admin_email: String,
    password_hash: String,
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl AuthService {
    /// `password_hash` must be a PHC string, e.g. from [`hash_password`].
    pub fn new(
        admin_email: impl Into<String>,
        password_hash: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            admin_email: admin_email.into(),
            password_hash: password_hash.into(),
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Convenience constructor that hashes a plaintext password first. Used
    /// when only `ADMIN_PASSWORD` is configured.
    pub fn with_plain_password(
        admin_email: impl Into<String>,
        password: &str,
        ttl: Duration,
    ) -> Result<Self, AuthError> {
        Ok(Self::new(admin_email, hash_password(password)?, ttl))
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if email != self.admin_email {
            return Err(AuthError::InvalidCredentials);
        }
        let hash = PasswordHash::new(&self.password_hash)
            .map_err(|e| AuthError::BadHash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions
            .write()
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    /// Look up a live session. Expired tokens are dropped on the way out.
    pub fn session(&self, token: &str) -> Option<Session> {
        let mut sessions = self.sessions.write();
        match sessions.get(token) {
            Some(s) if s.expires_at > Utc::now() => Some(s.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Invalidate a token. Unknown tokens are a no-op, so logout is
    /// idempotent.
    pub fn sign_out(&self, token: &str) {
        self.sessions.write().remove(token);
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::BadHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(ttl: Duration) -> AuthService {
        AuthService::with_plain_password("admin@atelier.local", "s3cret", ttl).unwrap()
    }

    #[test]
    fn test_sign_in_rejects_wrong_credentials() {
        let auth = service(Duration::hours(1));
        assert!(auth.sign_in("admin@atelier.local", "wrong").is_err());
        assert!(auth.sign_in("other@atelier.local", "s3cret").is_err());
    }

    #[test]
    fn test_sign_in_mints_a_session() {
        let auth = service(Duration::hours(1));
        let session = auth.sign_in("admin@atelier.local", "s3cret").unwrap();
        assert_eq!(session.token.len(), 32);
        assert!(session.expires_at > session.created_at);

        let looked_up = auth.session(&session.token).unwrap();
        assert_eq!(looked_up.email, "admin@atelier.local");
    }

    #[test]
    fn test_sign_out_invalidates_the_token() {
        let auth = service(Duration::hours(1));
        let session = auth.sign_in("admin@atelier.local", "s3cret").unwrap();
        auth.sign_out(&session.token);
        assert!(auth.session(&session.token).is_none());
        // Doubly signing out is fine.
        auth.sign_out(&session.token);
    }

    #[test]
    fn test_expired_session_is_dropped() {
        let auth = service(Duration::zero());
        let session = auth.sign_in("admin@atelier.local", "s3cret").unwrap();
        assert!(auth.session(&session.token).is_none());
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let auth = service(Duration::hours(1));
        assert!(auth.session("deadbeef").is_none());
    }
}
