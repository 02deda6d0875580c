//! Authentication Models
//! User accounts, token claims and the login/registration form payloads

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 30;
pub const PASSWORD_MIN_CHARS: usize = 8;
/// bcrypt only reads this many bytes of input
pub const PASSWORD_MAX_BYTES: usize = 72;

/// User account
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>, // stringified user id
    pub exp: i64,            // absolute expiry, unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Registration / login form body
#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// User response (sanitized)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let chars = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&chars) {
        return Err(ValidationError::new(
            "username",
            format!(
                "must be between {} and {} characters",
                USERNAME_MIN_CHARS, USERNAME_MAX_CHARS
            ),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ValidationError::new(
            "password",
            format!("must be at least {} characters", PASSWORD_MIN_CHARS),
        ));
    }
    if password.len() > PASSWORD_MAX_BYTES {
        return Err(ValidationError::new(
            "password",
            format!("must be at most {} bytes", PASSWORD_MAX_BYTES),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            password_hash: "$2b$04$secret".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!format!("{:?}", user).contains("secret"));
    }

    #[test]
    fn test_username_bounds_counted_in_chars() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(30)).is_ok());
        assert!(validate_username(&"a".repeat(31)).is_err());
        // three multi-byte characters are still three characters
        assert!(validate_username("äöü").is_ok());
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("password").is_ok());
        assert!(validate_password(&"p".repeat(72)).is_ok());
        let err = validate_password(&"p".repeat(73)).unwrap_err();
        assert_eq!(err.field, "password");
    }

    #[test]
    fn test_password_minimum_counted_in_chars() {
        // four characters, eight bytes
        assert!(validate_password("äöüß").is_err());
        assert!(validate_password("äöüßäöüß").is_ok());
        // 36 two-byte characters hit the bcrypt byte ceiling exactly
        assert!(validate_password(&"ä".repeat(36)).is_ok());
        assert!(validate_password(&"ä".repeat(37)).is_err());
    }

    #[test]
    fn test_claims_without_subject_deserialize() {
        let claims: Claims = serde_json::from_str(r#"{"exp": 1700000000}"#).unwrap();
        assert!(claims.sub.is_none());
        assert_eq!(claims.exp, 1700000000);
    }
}
