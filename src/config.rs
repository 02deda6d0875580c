//! Application configuration
//! Loaded once at start-up and shared read-only for the process lifetime

use anyhow::{bail, Context, Result};
use jsonwebtoken::Algorithm;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SECRET_KEY: &str = "change_this_secret_key";
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 30;
pub const DEFAULT_DATABASE_PATH: &str = "./data/memory_app.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;

/// Process-wide settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_ttl: Duration,
    pub database_path: PathBuf,
    pub bcrypt_cost: u32,
    pub store_timeout: Duration,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let secret_key = std::env::var("SECRET_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string());

        let algorithm = parse_algorithm(
            &std::env::var("ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),
        )?;

        let ttl_minutes = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("Invalid ACCESS_TOKEN_EXPIRE_MINUTES")?
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        if ttl_minutes == 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        let database_path = std::env::var("DATABASE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("Invalid BCRYPT_COST")?
            .unwrap_or(bcrypt::DEFAULT_COST);

        let store_timeout_ms = std::env::var("STORE_TIMEOUT_MS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("Invalid STORE_TIMEOUT_MS")?
            .unwrap_or(DEFAULT_STORE_TIMEOUT_MS);

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let config = Self {
            secret_key,
            algorithm,
            access_token_ttl: Duration::from_secs(ttl_minutes * 60),
            database_path,
            bcrypt_cost,
            store_timeout: Duration::from_millis(store_timeout_ms),
            bind_addr,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the hasher or token service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.is_empty() {
            bail!("SECRET_KEY must not be empty");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31, got {}", self.bcrypt_cost);
        }
        if self.access_token_ttl.is_zero() {
            bail!("token TTL must be positive");
        }
        Ok(())
    }

    pub fn is_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

/// Only the HMAC family is accepted: tokens are signed and verified with one shared secret.
pub fn parse_algorithm(name: &str) -> Result<Algorithm> {
    match name.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => bail!("Unsupported token algorithm {other:?}; expected HS256, HS384 or HS512"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            secret_key: "test-secret".to_string(),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::from_secs(30 * 60),
            database_path: PathBuf::from("test.db"),
            bcrypt_cost: 4,
            store_timeout: Duration::from_millis(500),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }

    #[test]
    fn test_parse_symmetric_algorithms() {
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("hs384").unwrap(), Algorithm::HS384);
        assert_eq!(parse_algorithm(" HS512 ").unwrap(), Algorithm::HS512);
    }

    #[test]
    fn test_asymmetric_and_none_rejected() {
        assert!(parse_algorithm("RS256").is_err());
        assert!(parse_algorithm("EdDSA").is_err());
        assert!(parse_algorithm("none").is_err());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(sample_config().validate().is_ok());

        let mut cfg = sample_config();
        cfg.bcrypt_cost = 3;
        assert!(cfg.validate().is_err());

        let mut cfg = sample_config();
        cfg.secret_key = String::new();
        assert!(cfg.validate().is_err());

        let mut cfg = sample_config();
        cfg.access_token_ttl = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_default_secret_detection() {
        let mut cfg = sample_config();
        assert!(!cfg.is_default_secret());
        cfg.secret_key = DEFAULT_SECRET_KEY.to_string();
        assert!(cfg.is_default_secret());
    }
}
