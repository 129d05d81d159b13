//! UI rendering
//!
//! Render functions draw state into a frame and have no other effects.
//! The add-contact dialog lives in `form` because its inputs are stateful.

pub mod form;

pub use form::ContactForm;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use libcontacts::SortOrder;
use crate::app::AppState;

/// Render the application UI
pub fn render(frame: &mut Frame, state: &AppState, form: &mut ContactForm) {
    let area = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Sort header
            Constraint::Min(3),    // Contact list
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    render_sort_header(frame, chunks[0], state);
    render_contact_list(frame, chunks[1], state);
    render_status_bar(frame, chunks[2], state);

    if state.view.is_adding_contact {
        form.render(frame, area, state);
    }

    if state.help_visible {
        render_help_overlay(frame, area);
    }

    if let Some(ref error) = state.error {
        render_error_overlay(frame, area, error);
    }
}

fn accent(state: &AppState, color: Color) -> Style {
    if state.config.colors_enabled {
        Style::default().fg(color)
    } else {
        Style::default()
    }
}

/// "Order Contacts:" with one radio item per sort order
fn render_sort_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let (on, off) = if state.config.unicode_enabled {
        ("◉", "○")
    } else {
        ("(*)", "( )")
    };

    let mut spans = vec![Span::styled(
        "Order Contacts: ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (index, order) in SortOrder::ALL.iter().enumerate() {
        let active = *order == state.view.sort_order;
        let marker = if active { on } else { off };
        let style = if active {
            accent(state, Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(
            format!("{} {} [{}]  ", marker, order.label(), index + 1),
            style,
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_contact_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!(" Contacts ({}) ", state.view.contacts.len()))
        .borders(Borders::ALL);

    if state.view.contacts.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No contacts yet", accent(state, Color::Yellow))),
            Line::from(""),
            Line::from("Press a to add one"),
        ])
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .view
        .contacts
        .iter()
        .map(|contact| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    contact.display_name(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    contact.phone_number.clone(),
                    accent(state, Color::Gray),
                )),
            ])
        })
        .collect();

    let highlight = if state.config.colors_enabled {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol(if state.config.unicode_enabled { "▶ " } else { "> " });

    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = if state.view.is_adding_contact {
        "Enter: Save | Tab: Next field | Esc: Cancel"
    } else {
        "a: Add | d: Delete | 1-3/s: Sort | F1: Help | q: Quit"
    };

    let mut spans = Vec::new();
    if let Some(ref message) = state.status.message {
        spans.push(Span::styled(message.clone(), accent(state, Color::Green)));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(hints, accent(state, Color::Gray)));

    let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Contacts:"),
        Line::from("  a        - Add contact"),
        Line::from("  d, Del   - Delete selected contact"),
        Line::from("  j/k, ↑/↓ - Move selection"),
        Line::from("  1, 2, 3  - Sort by first name, last name, phone"),
        Line::from("  s        - Next sort order"),
        Line::from("  q        - Quit"),
        Line::from(""),
        Line::from("Add Contact dialog:"),
        Line::from("  Tab      - Next field (Shift+Tab: previous)"),
        Line::from("  Enter    - Save (all fields required)"),
        Line::from("  Esc      - Close, keeping what was typed"),
        Line::from(""),
        Line::from("Press Esc or F1 to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled("Error", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(error),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .block(Block::default()
            .title(" Error ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)))
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

/// Helper to create centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{reduce, Action};
    use libcontacts::service::ViewState;
    use libcontacts::Contact;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(state: &AppState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut form = ContactForm::new();
        terminal.draw(|frame| render(frame, state, &mut form)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_contacts_and_sort_header() {
        let view = ViewState {
            contacts: vec![Contact::new("Ana", "Pop", "12345").with_id(1)],
            ..ViewState::default()
        };
        let state = reduce(AppState::new(), Action::ViewUpdated(view));

        let text = screen_text(&state);
        assert!(text.contains("Order Contacts:"));
        assert!(text.contains("Ana Pop"));
        assert!(text.contains("12345"));
        assert!(text.contains("Contacts (1)"));
    }

    #[test]
    fn test_renders_dialog_when_adding() {
        let view = ViewState {
            is_adding_contact: true,
            ..ViewState::default()
        };
        let state = reduce(AppState::new(), Action::ViewUpdated(view));

        let text = screen_text(&state);
        assert!(text.contains("Add Contact"));
        assert!(text.contains("Phone Number"));
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 60, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
    }
}
