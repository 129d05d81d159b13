//! Test application initialization and boot sequence
//!
//! Verifies that the app initializes with correct defaults
//! based on environment variables.

use contacts_tui::app::{AppState, FormField};
use libcontacts::SortOrder;
use serial_test::serial;

#[test]
fn test_app_boots_to_empty_list() {
    let state = AppState::new();

    assert!(!state.should_quit);
    assert!(state.view.contacts.is_empty());
    assert_eq!(state.selected, 0);
    assert!(state.selected_contact().is_none());
}

#[test]
fn test_dialog_closed_on_boot() {
    let state = AppState::new();

    assert!(!state.view.is_adding_contact);
    assert!(!state.editing());
    assert_eq!(state.focus, FormField::FirstName);
}

#[test]
fn test_sorted_by_first_name_on_boot() {
    let state = AppState::new();

    assert_eq!(state.view.sort_order, SortOrder::FirstName);
}

#[test]
fn test_no_overlays_on_boot() {
    let state = AppState::new();

    assert!(!state.help_visible);
    assert!(state.error.is_none());
    assert!(state.status.message.is_none());
}

#[test]
#[serial]
fn test_colors_disabled_with_no_color_env() {
    std::env::set_var("NO_COLOR", "1");
    let state = AppState::new();
    std::env::remove_var("NO_COLOR");

    assert!(!state.config.colors_enabled);
    assert!(!state.config.unicode_enabled);
}

#[test]
#[serial]
fn test_colors_disabled_with_contacts_tui_no_color_env() {
    std::env::set_var("CONTACTS_TUI_NO_COLOR", "1");
    let state = AppState::new();
    std::env::remove_var("CONTACTS_TUI_NO_COLOR");

    assert!(!state.config.colors_enabled);
}

#[test]
#[serial]
fn test_tick_rate_from_env() {
    std::env::set_var("CONTACTS_TUI_TICK_MS", "250");
    let state = AppState::new();
    std::env::remove_var("CONTACTS_TUI_TICK_MS");

    assert_eq!(state.config.tick_rate_ms, 250);
}

#[test]
#[serial]
fn test_tick_rate_default_100ms() {
    std::env::remove_var("CONTACTS_TUI_TICK_MS");
    let state = AppState::new();

    assert_eq!(state.config.tick_rate_ms, 100);
}

#[test]
#[serial]
fn test_invalid_tick_rate_falls_back_to_default() {
    std::env::set_var("CONTACTS_TUI_TICK_MS", "fast");
    let state = AppState::new();
    std::env::remove_var("CONTACTS_TUI_TICK_MS");

    assert_eq!(state.config.tick_rate_ms, 100);
}
