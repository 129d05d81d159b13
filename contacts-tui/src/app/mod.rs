//! Application module
//!
//! - Actions: what can happen
//! - State: what the screen shows right now
//! - Reducer: pure `(State, Action) -> State`, plus the key map
//!
//! Contact data and the add-contact form live in the controller; this
//! state only holds the latest `ViewState` snapshot and presentation-only
//! fields (selection, focused input, overlays).

pub mod actions;
pub mod state;
pub mod reducer;
pub mod event;

pub use actions::Action;
pub use state::{AppState, FormField, StatusBarState, UiConfig};
pub use reducer::{reduce, resolve_key};
