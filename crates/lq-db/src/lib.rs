pub mod achievement_repo;
pub mod event_repo;
pub mod idempotency;
pub mod profile_repo;
pub mod roadmap_repo;
pub mod schema;
pub mod store;
pub mod util;

pub use crate::store::DbStore;
