//! SQLite persistence for disaggregation results.
//!
//! One serialized writer plus a small pool of read-only connections, schema
//! migrations keyed on `PRAGMA user_version`, plain query functions taking a
//! `&Connection`, and [`SqliteResultStore`], the `DisaggResultSink` the
//! calculator writes into.

pub mod blob;
pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::DatabaseManager;
pub use store::SqliteResultStore;
