//! Owner-scoped storage for clubs and teams.

pub mod in_memory;
pub mod postgres;
pub mod resource_store;

pub use in_memory::InMemoryResourceStore;
pub use postgres::{PostgresClubStore, PostgresTeamStore};
pub use resource_store::{OwnerRegistry, ResourceStore, StoreError, StoredResource};
