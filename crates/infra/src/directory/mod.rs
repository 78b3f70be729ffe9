//! Account directory implementations.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryAccountDirectory;
pub use postgres::PostgresAccountDirectory;
