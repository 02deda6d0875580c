//! Memories Module
//! Short text records, each owned by the user who created it

pub mod api;
pub mod guard;
pub mod models;
pub(crate) mod store;

pub use guard::RecordAccessGuard;
pub use models::Memory;
