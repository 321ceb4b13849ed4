//! # pulse-database
//!
//! The notification store interface and its two implementations:
//! PostgreSQL for deployment, in-memory for tests and local development.

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use postgres::PgNotificationStore;
pub use store::{InsertOutcome, NotificationFilter, NotificationPage, NotificationStore};
