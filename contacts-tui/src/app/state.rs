//! Application state
//!
//! Immutable state structure; transitions happen through the reducer
//! (see `reducer.rs`).

use libcontacts::service::{ContactEvent, ViewState};
use libcontacts::{Contact, SortOrder};

/// Root application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Should the application quit?
    pub should_quit: bool,

    /// Help overlay visible?
    pub help_visible: bool,

    /// Latest snapshot from the contact controller
    pub view: ViewState,

    /// Index of the highlighted contact
    pub selected: usize,

    /// Last sort order dispatched, which the view may not show yet
    pub sort_order: Option<SortOrder>,

    /// Input focused in the add-contact dialog
    pub focus: FormField,

    /// Status bar state
    pub status: StatusBarState,

    /// Error overlay state
    pub error: Option<String>,

    /// UI configuration
    pub config: UiConfig,
}

/// One input of the add-contact dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    PhoneNumber,
}

impl FormField {
    pub const ALL: [FormField; 3] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::PhoneNumber,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::FirstName => "First Name",
            FormField::LastName => "Last Name",
            FormField::PhoneNumber => "Phone Number",
        }
    }

    pub fn next(&self) -> FormField {
        match self {
            FormField::FirstName => FormField::LastName,
            FormField::LastName => FormField::PhoneNumber,
            FormField::PhoneNumber => FormField::FirstName,
        }
    }

    pub fn previous(&self) -> FormField {
        match self {
            FormField::FirstName => FormField::PhoneNumber,
            FormField::LastName => FormField::FirstName,
            FormField::PhoneNumber => FormField::LastName,
        }
    }

    /// Controller event that sets this field to `value`
    pub fn event(&self, value: String) -> ContactEvent {
        match self {
            FormField::FirstName => ContactEvent::SetFirstName(value),
            FormField::LastName => ContactEvent::SetLastName(value),
            FormField::PhoneNumber => ContactEvent::SetPhoneNumber(value),
        }
    }

    /// Current draft value of this field
    pub fn value<'a>(&self, view: &'a ViewState) -> &'a str {
        match self {
            FormField::FirstName => &view.first_name,
            FormField::LastName => &view.last_name,
            FormField::PhoneNumber => &view.phone_number,
        }
    }
}

/// Status bar state
#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    /// Current status message
    pub message: Option<String>,
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Use colors?
    pub colors_enabled: bool,

    /// Use unicode symbols (false = ASCII fallback)
    pub unicode_enabled: bool,

    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            should_quit: false,
            help_visible: false,
            view: ViewState::default(),
            selected: 0,
            sort_order: None,
            focus: FormField::FirstName,
            status: StatusBarState::default(),
            error: None,
            config: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err()
            && std::env::var("CONTACTS_TUI_NO_COLOR").is_err();

        let unicode_enabled = colors_enabled;

        let tick_rate_ms = std::env::var("CONTACTS_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            colors_enabled,
            unicode_enabled,
            tick_rate_ms,
        }
    }
}

impl AppState {
    /// Create new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Contact under the selection cursor
    pub fn selected_contact(&self) -> Option<&Contact> {
        self.view.contacts.get(self.selected)
    }

    /// Sort order the user chose last, falling back to the displayed one
    pub fn selected_sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or(self.view.sort_order)
    }

    /// Is the add-contact dialog open with no overlay above it?
    pub fn editing(&self) -> bool {
        self.view.is_adding_contact && !self.help_visible && self.error.is_none()
    }
}
