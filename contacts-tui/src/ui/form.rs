//! Add-contact dialog with tui-textarea inputs
//!
//! The controller owns the draft values; each input is re-synced from the
//! latest `ViewState` so a save (which clears the drafts) empties them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libcontacts::service::ViewState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};
use tui_textarea::{CursorMove, TextArea};
use crate::app::{AppState, FormField};

/// Stateful dialog widget, one single-line input per field
pub struct ContactForm<'a> {
    inputs: [TextArea<'a>; 3],
}

impl Default for ContactForm<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ContactForm<'a> {
    pub fn new() -> Self {
        Self {
            inputs: FormField::ALL.map(|field| input_for(field, "")),
        }
    }

    fn index(field: FormField) -> usize {
        match field {
            FormField::FirstName => 0,
            FormField::LastName => 1,
            FormField::PhoneNumber => 2,
        }
    }

    /// Current text of one input
    pub fn content(&self, field: FormField) -> String {
        self.inputs[Self::index(field)].lines().join("")
    }

    /// Feed a key to the input for `field`
    ///
    /// Returns the new content when the key changed it. Line breaks are
    /// rejected; every input holds a single line.
    pub fn input(&mut self, field: FormField, key: KeyEvent) -> Option<String> {
        let newline = key.code == KeyCode::Enter
            || (key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('m') | KeyCode::Char('j')));
        if newline {
            return None;
        }

        let textarea = &mut self.inputs[Self::index(field)];
        if textarea.input(key) {
            Some(textarea.lines().join(""))
        } else {
            None
        }
    }

    /// Replace any input whose text differs from the controller's draft
    pub fn sync(&mut self, view: &ViewState) {
        for field in FormField::ALL {
            let value = field.value(view);
            if self.content(field) != value {
                self.inputs[Self::index(field)] = input_for(field, value);
            }
        }
    }

    /// Render the dialog centered over `area`
    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let popup_area = centered_box(50, 13, area);
        frame.render_widget(Clear, popup_area);

        let accent = if state.config.colors_enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let outer = Block::default()
            .title(" Add Contact ")
            .borders(Borders::ALL)
            .border_style(accent);
        let inner = outer.inner(popup_area);
        frame.render_widget(outer, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        for field in FormField::ALL {
            let focused = field == state.focus;
            let textarea = &mut self.inputs[Self::index(field)];
            style_input(textarea, field, focused, state.config.colors_enabled);
            frame.render_widget(&*textarea, chunks[Self::index(field)]);
        }

        let hints = Paragraph::new(Line::from("Enter: Save | Tab: Next field | Esc: Cancel"))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(hints, chunks[3]);
    }
}

fn input_for<'a>(field: FormField, value: &str) -> TextArea<'a> {
    let mut textarea = TextArea::new(vec![value.to_string()]);
    textarea.move_cursor(CursorMove::End);
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text(field.label());
    textarea
}

fn style_input(textarea: &mut TextArea<'_>, field: FormField, focused: bool, colors: bool) {
    let border = match (focused, colors) {
        (true, true) => Style::default().fg(Color::Yellow),
        (true, false) => Style::default().add_modifier(Modifier::BOLD),
        (false, _) => Style::default(),
    };
    textarea.set_block(
        Block::default()
            .title(format!(" {} ", field.label()))
            .borders(Borders::ALL)
            .border_style(border),
    );
    // Only the focused input shows a cursor
    let cursor = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    textarea.set_cursor_style(cursor);
}

/// Centered box `width` columns by `height` rows, shrunk to fit `r`
fn centered_box(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_reports_new_content() {
        let mut form = ContactForm::new();

        assert_eq!(form.input(FormField::FirstName, key(KeyCode::Char('A'))), Some("A".to_string()));
        assert_eq!(form.input(FormField::FirstName, key(KeyCode::Char('n'))), Some("An".to_string()));
        assert_eq!(form.content(FormField::LastName), "");
    }

    #[test]
    fn test_enter_is_not_inserted() {
        let mut form = ContactForm::new();
        form.input(FormField::PhoneNumber, key(KeyCode::Char('0')));

        assert_eq!(form.input(FormField::PhoneNumber, key(KeyCode::Enter)), None);
        assert_eq!(form.content(FormField::PhoneNumber), "0");
    }

    #[test]
    fn test_sync_replaces_stale_inputs() {
        let mut form = ContactForm::new();
        form.input(FormField::FirstName, key(KeyCode::Char('X')));

        let view = ViewState {
            last_name: "Pop".to_string(),
            ..ViewState::default()
        };
        form.sync(&view);

        assert_eq!(form.content(FormField::FirstName), "");
        assert_eq!(form.content(FormField::LastName), "Pop");

        // Cursor sits at the end after sync
        assert_eq!(form.input(FormField::LastName, key(KeyCode::Char('a'))), Some("Popa".to_string()));
    }
}
