//! Identity resolution
//!
//! Runs at the top of every protected handler: session cookie → bearer token →
//! token validation → user lookup. Every failure is reported to the caller as
//! the same `Unauthenticated` outcome; the specific reason only reaches the logs.

use crate::auth::{jwt::TokenService, models::User, user_store::UserStore};
use crate::error::AuthError;
use axum_extra::extract::cookie::CookieJar;
use rusqlite::Connection;
use std::ops::Deref;
use tracing::debug;

pub const SESSION_COOKIE: &str = "access_token";
pub const BEARER_SCHEME: &str = "Bearer";

/// A user whose session token was verified on this request.
///
/// Only the resolver (and crate-internal tests) can construct one, so any
/// operation that takes `&AuthenticatedUser` is gated on authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    pub(crate) fn from_verified(user: User) -> Self {
        Self(user)
    }

    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }

}

impl Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

/// Cookie value carrying a token: `Bearer <token>`
pub fn session_cookie_value(token: &str) -> String {
    format!("{} {}", BEARER_SCHEME, token)
}

/// Pull the raw token out of the session cookie
pub fn bearer_token(jar: &CookieJar) -> Result<String, AuthError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or_else(|| {
        debug!("no session cookie");
        AuthError::Unauthenticated
    })?;

    let value = cookie.value().trim().trim_matches('"');
    let (scheme, token) = value.split_once(' ').ok_or_else(|| {
        debug!("session cookie without scheme");
        AuthError::Unauthenticated
    })?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        debug!(scheme, "unexpected auth scheme in session cookie");
        return Err(AuthError::Unauthenticated);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthenticated);
    }
    Ok(token.to_string())
}

/// Resolve the calling user from the session cookie.
///
/// Read-only; safe to run for any number of concurrent requests, each on its
/// own connection.
pub fn resolve_identity(
    conn: &Connection,
    tokens: &TokenService,
    jar: &CookieJar,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(jar)?;

    let user_id = tokens.validate(&token).map_err(|reason| {
        debug!(%reason, "session token rejected");
        AuthError::Unauthenticated
    })?;

    match UserStore::new(conn).get_by_id(user_id)? {
        Some(user) => Ok(AuthenticatedUser::from_verified(user)),
        None => {
            debug!(user_id, "token subject no longer exists");
            Err(AuthError::Unauthenticated)
        }
    }
}
