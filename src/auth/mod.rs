//! Authentication Module
//! Password hashing, session tokens, accounts and per-request identity

pub mod accounts;
pub mod api;
pub mod identity;
pub mod jwt;
pub mod models;
pub mod password;
pub mod user_store;

pub use accounts::Accounts;
pub use identity::{resolve_identity, AuthenticatedUser};
pub use jwt::TokenService;
pub use password::CredentialHasher;
pub use user_store::UserStore;
