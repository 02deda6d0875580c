//! Account management
//! Registration and login on top of the hasher, token service and user store

use crate::auth::{
    jwt::TokenService,
    models::{validate_password, validate_username, User},
    password::CredentialHasher,
    user_store::UserStore,
};
use crate::error::{AuthError, RegistrationError};
use rusqlite::Connection;
use tracing::{info, warn};

/// Registration and login for one request's connection
pub struct Accounts<'a> {
    users: UserStore<'a>,
    hasher: &'a CredentialHasher,
    tokens: &'a TokenService,
}

impl<'a> Accounts<'a> {
    pub fn new(conn: &'a Connection, hasher: &'a CredentialHasher, tokens: &'a TokenService) -> Self {
        Self {
            users: UserStore::new(conn),
            hasher,
            tokens,
        }
    }

    /// Create an account.
    ///
    /// Input is validated before the store is touched. The lookup-then-insert
    /// is not atomic; the unique index on `username` decides a concurrent race
    /// and the loser gets `UsernameTaken`.
    pub fn register(&self, username: &str, password: &str) -> Result<User, RegistrationError> {
        validate_username(username)?;
        validate_password(password)?;

        if self.users.get_by_username(username)?.is_some() {
            warn!(username, "registration rejected: username taken");
            return Err(RegistrationError::UsernameTaken);
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self.users.insert(username, &password_hash).map_err(|e| {
            let err = RegistrationError::from(e);
            if matches!(err, RegistrationError::UsernameTaken) {
                warn!(username, "registration lost a concurrent race for username");
            }
            err
        })?;

        info!(user_id = user.id, username, "registered user");
        Ok(user)
    }

    /// Check credentials and issue a session token.
    ///
    /// Unknown username and wrong password produce the same error, and both
    /// pay for one bcrypt verification.
    pub fn login(&self, username: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = self.users.get_by_username(username)?;

        let verified = match &user {
            Some(user) => self.hasher.verify(password, &user.password_hash),
            None => self.hasher.verify_dummy(password),
        };

        let user = match user {
            Some(user) if verified => user,
            _ => {
                warn!(username, "failed login attempt");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(user.id).map_err(AuthError::TokenIssue)?;

        info!(user_id = user.id, username, "login successful");
        Ok((user, token))
    }
}
