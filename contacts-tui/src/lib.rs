//! contacts-tui library
//!
//! Exports the application state machine, rendering and the service bridge
//! so they can be tested without a terminal.

pub mod error;
pub mod app;
pub mod services;
pub mod terminal;
pub mod ui;

// Re-export commonly used types
pub use error::{TuiError, Result};
pub use app::{AppState, Action, FormField, reduce, resolve_key};
