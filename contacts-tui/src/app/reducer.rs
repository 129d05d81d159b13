//! Pure reducer function for state transitions
//!
//! The reducer is a pure function: `(State, Action) -> State`. It never
//! talks to the controller; `Action::Dispatch` is forwarded by the main loop
//! and only its presentation-side effects (focus reset, status message) are
//! applied here.

use super::actions::Action;
use super::state::{AppState, FormField, StatusBarState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libcontacts::service::{ContactEvent, ViewState};
use libcontacts::SortOrder;

/// Pure reducer function
///
/// Takes current state and an action, returns new state.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === UI Events ===
        Action::Key(key) => match resolve_key(&state, key) {
            Some(action) => reduce(state, action),
            None => state,
        },
        Action::Tick => state,
        Action::Resize(_, _) => state, // Terminal auto-handles resize

        // === Navigation ===
        Action::Quit => AppState {
            should_quit: true,
            ..state
        },

        Action::ShowHelp => AppState {
            help_visible: true,
            ..state
        },

        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        Action::SelectNext => {
            let last = state.view.contacts.len().saturating_sub(1);
            AppState {
                selected: (state.selected + 1).min(last),
                ..state
            }
        }

        Action::SelectPrevious => AppState {
            selected: state.selected.saturating_sub(1),
            ..state
        },

        Action::FocusNextField => AppState {
            focus: state.focus.next(),
            ..state
        },

        Action::FocusPreviousField => AppState {
            focus: state.focus.previous(),
            ..state
        },

        // === Controller ===
        Action::Dispatch(event) => apply_dispatch(state, &event),

        Action::ViewUpdated(view) => apply_view(state, view),

        // === Error Handling ===
        Action::ShowError(error) => AppState {
            error: Some(error),
            ..state
        },

        Action::DismissError => AppState {
            error: None,
            ..state
        },
    }
}

/// Presentation-side consequences of a dispatched controller event
fn apply_dispatch(state: AppState, event: &ContactEvent) -> AppState {
    match event {
        ContactEvent::ShowDialog => AppState {
            focus: FormField::FirstName,
            status: StatusBarState { message: None },
            ..state
        },
        ContactEvent::DeleteContact(contact) => AppState {
            status: StatusBarState {
                message: Some(format!("Deleted {}", contact.display_name())),
            },
            ..state
        },
        ContactEvent::SortContacts(order) => AppState {
            sort_order: Some(*order),
            status: StatusBarState {
                message: Some(format!("Sorted by {}", order.label())),
            },
            ..state
        },
        _ => state,
    }
}

/// Take a new controller snapshot, keeping the selection in range
fn apply_view(state: AppState, view: ViewState) -> AppState {
    let selected = state.selected.min(view.contacts.len().saturating_sub(1));
    AppState {
        view,
        selected,
        ..state
    }
}

/// Map a key press to an action
///
/// Returns `None` for keys with no binding in the current mode. While the
/// add-contact dialog is open, unbound keys belong to the focused input.
pub fn resolve_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    // Overlays capture input
    if state.error.is_some() {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::DismissError),
            _ => None,
        };
    }

    if state.help_visible {
        return match key.code {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') => Some(Action::HideHelp),
            _ => None,
        };
    }

    if key.code == KeyCode::F(1) {
        return Some(Action::ShowHelp);
    }

    if state.view.is_adding_contact {
        resolve_dialog_key(key)
    } else {
        resolve_list_key(state, key)
    }
}

fn resolve_dialog_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Dispatch(ContactEvent::HideDialog)),
        KeyCode::Enter => Some(Action::Dispatch(ContactEvent::SaveContact)),
        KeyCode::Tab | KeyCode::Down => Some(Action::FocusNextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::FocusPreviousField),
        _ => None,
    }
}

fn resolve_list_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('a') | KeyCode::Char('+') => Some(Action::Dispatch(ContactEvent::ShowDialog)),
        KeyCode::Char('d') | KeyCode::Delete => state
            .selected_contact()
            .map(|contact| Action::Dispatch(ContactEvent::DeleteContact(contact.clone()))),
        KeyCode::Char('s') => Some(sort(state.selected_sort_order().next())),
        KeyCode::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            Some(sort(SortOrder::ALL[index]))
        }
        KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
        _ => None,
    }
}

fn sort(order: SortOrder) -> Action {
    Action::Dispatch(ContactEvent::SortContacts(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use libcontacts::Contact;

    fn with_contacts(count: usize) -> AppState {
        let contacts = (0..count)
            .map(|i| Contact::new(format!("First{i}"), "Last", "0700").with_id(i as i64 + 1))
            .collect();
        reduce(
            AppState::new(),
            Action::ViewUpdated(ViewState {
                contacts,
                ..ViewState::default()
            }),
        )
    }

    #[test]
    fn test_reducer_is_pure() {
        let state = AppState::new();
        let state_clone = state.clone();

        let new_state = reduce(state_clone.clone(), Action::ShowError("Test".to_string()));

        assert!(state_clone.error.is_none());
        assert_eq!(new_state.error, Some("Test".to_string()));
    }

    #[test]
    fn test_sort_dispatch_records_selection_before_view_catches_up() {
        let state = with_contacts(1);
        assert_eq!(state.selected_sort_order(), SortOrder::FirstName);

        let state = reduce(state, sort(SortOrder::PhoneNumber));
        assert_eq!(state.view.sort_order, SortOrder::FirstName);
        assert_eq!(state.selected_sort_order(), SortOrder::PhoneNumber);
        assert_eq!(state.status.message.as_deref(), Some("Sorted by Phone number"));
    }

    #[test]
    fn test_quit_action() {
        let state = AppState::new();
        assert!(!state.should_quit);

        let new_state = reduce(state, Action::Quit);
        assert!(new_state.should_quit);
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut state = with_contacts(2);
        state = reduce(state, Action::SelectPrevious);
        assert_eq!(state.selected, 0);

        state = reduce(state, Action::SelectNext);
        state = reduce(state, Action::SelectNext);
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn test_view_update_clamps_selection() {
        let mut state = with_contacts(3);
        state = reduce(state, Action::SelectNext);
        state = reduce(state, Action::SelectNext);
        assert_eq!(state.selected, 2);

        let shorter = ViewState {
            contacts: state.view.contacts[..1].to_vec(),
            ..state.view.clone()
        };
        state = reduce(state, Action::ViewUpdated(shorter));
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_show_dialog_resets_focus() {
        let mut state = AppState::new();
        state = reduce(state, Action::FocusNextField);
        assert_eq!(state.focus, FormField::LastName);

        state = reduce(state, Action::Dispatch(ContactEvent::ShowDialog));
        assert_eq!(state.focus, FormField::FirstName);
    }

    #[test]
    fn test_focus_wraps_around() {
        let state = reduce(AppState::new(), Action::FocusPreviousField);
        assert_eq!(state.focus, FormField::PhoneNumber);

        let state = reduce(state, Action::FocusNextField);
        assert_eq!(state.focus, FormField::FirstName);
    }

    #[test]
    fn test_delete_without_selection_resolves_to_nothing() {
        let state = AppState::new();
        let key = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE);
        assert!(resolve_key(&state, key).is_none());
    }
}
