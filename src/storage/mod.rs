//! Row Store: accepts one `(username, wan_ip, speed, password)` row at a
//! time.
//!
//! [`PgRowStore`] is the PostgreSQL implementation. The connection is opened
//! once at startup and shared for the life of the process.

mod error;
mod postgres;
mod store;

pub use error::StorageError;
pub use postgres::PgRowStore;
pub use store::{RowStore, insert_with_timeout};
