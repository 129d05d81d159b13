//! Actions for the reducer pattern
//!
//! All state transitions are triggered by actions. `Dispatch` carries a
//! controller event; the main loop forwards it to the controller and the
//! reducer only applies its presentation-side consequences.

use crossterm::event::KeyEvent;
use libcontacts::service::{ContactEvent, ViewState};

#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    /// Keyboard input event
    Key(KeyEvent),

    /// Periodic tick
    Tick,

    /// Terminal resize event
    Resize(u16, u16),

    // === Navigation ===
    /// Quit the application
    Quit,

    /// Show help overlay
    ShowHelp,

    /// Hide help overlay
    HideHelp,

    /// Move the list selection down
    SelectNext,

    /// Move the list selection up
    SelectPrevious,

    /// Focus the next input of the add-contact dialog
    FocusNextField,

    /// Focus the previous input of the add-contact dialog
    FocusPreviousField,

    // === Controller ===
    /// User intent for the contact controller
    Dispatch(ContactEvent),

    /// New snapshot published by the controller
    ViewUpdated(ViewState),

    // === Error Handling ===
    /// Show error overlay
    ShowError(String),

    /// Dismiss error overlay
    DismissError,
}
