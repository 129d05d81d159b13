//! Contacts - a single-screen contact manager core
//!
//! This library provides the persistent contact store, live ordered queries,
//! and the per-session controller that turns user events into store
//! mutations and view state snapshots.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use error::{ContactsError, Result, StorageError, StorageResult};
pub use service::{ContactController, ContactEvent, MutationFailure, ViewState};
pub use store::{ContactStore, LiveQuery, MockContactStore, SqliteContactStore};
pub use types::{Contact, SortOrder};
