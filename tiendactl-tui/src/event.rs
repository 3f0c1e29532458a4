//! Key handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::mode::Mode;

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
///
/// Everything that needs the database is handed back to the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Nothing else to do
    Continue,
    Quit,
    /// Reload every row of the active panel
    Refresh,
    ApplyFilter,
    Save,
    Update,
    Delete,
    Clear,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') | KeyCode::Char('q') = key.code {
            return HandleResult::Quit;
        }
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Edit => handle_edit_mode(app, key),
        Mode::Filter => handle_filter_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Char('q') => HandleResult::Quit,

        KeyCode::Char('j') | KeyCode::Down => {
            app.active_panel_mut().select_next();
            HandleResult::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.active_panel_mut().select_prev();
            HandleResult::Continue
        }

        // Tab switching
        KeyCode::Char(c @ '1'..='5') => {
            let index = (c as usize) - ('1' as usize);
            if app.switch_tab(index) {
                HandleResult::Refresh
            } else {
                HandleResult::Continue
            }
        }
        KeyCode::Tab => {
            app.next_tab();
            HandleResult::Refresh
        }
        KeyCode::BackTab => {
            app.prev_tab();
            HandleResult::Refresh
        }

        KeyCode::Char('i') | KeyCode::Enter => {
            app.mode = Mode::Edit;
            HandleResult::Continue
        }
        KeyCode::Char('/') => {
            app.mode = Mode::Filter;
            HandleResult::Continue
        }

        KeyCode::Char('s') => HandleResult::Save,
        KeyCode::Char('u') => HandleResult::Update,
        KeyCode::Char('d') => HandleResult::Delete,
        KeyCode::Char('c') => HandleResult::Clear,
        KeyCode::Char('r') => HandleResult::Refresh,

        KeyCode::Char('?') => {
            app.show_help();
            HandleResult::Continue
        }

        _ => HandleResult::Continue,
    }
}

fn handle_edit_mode(app: &mut App, key: KeyEvent) -> HandleResult {
    if key.code == KeyCode::Esc {
        app.mode = Mode::Normal;
        return HandleResult::Continue;
    }

    let panel = app.active_panel_mut();
    match key.code {
        KeyCode::Tab | KeyCode::Enter | KeyCode::Down => panel.focus_next_field(),
        KeyCode::BackTab | KeyCode::Up => panel.focus_prev_field(),
        KeyCode::Backspace => {
            if let Some(field) = panel.focused_field_mut() {
                field.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(field) = panel.focused_field_mut() {
                field.push(c);
            }
        }
        _ => {}
    }
    HandleResult::Continue
}

fn handle_filter_mode(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Normal;
            HandleResult::Continue
        }
        KeyCode::Enter => {
            app.mode = Mode::Normal;
            HandleResult::ApplyFilter
        }
        KeyCode::Backspace => {
            app.active_panel_mut().filter_mut().pop();
            HandleResult::Continue
        }
        KeyCode::Char(c) => {
            app.active_panel_mut().filter_mut().push(c);
            HandleResult::Continue
        }
        _ => HandleResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiendactl_core::EntityKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn number_keys_switch_tabs_and_request_refresh() {
        let mut app = App::new("t");
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('4'))), HandleResult::Refresh);
        assert_eq!(app.active_panel().kind(), EntityKind::Sale);

        assert_eq!(handle_key(&mut app, key(KeyCode::BackTab)), HandleResult::Refresh);
        assert_eq!(app.active_panel().kind(), EntityKind::Category);
    }

    #[test]
    fn action_keys_map_to_store_operations() {
        let mut app = App::new("t");
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('s'))), HandleResult::Save);
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('u'))), HandleResult::Update);
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('d'))), HandleResult::Delete);
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('c'))), HandleResult::Clear);
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q'))), HandleResult::Quit);
    }

    #[test]
    fn edit_mode_types_into_focused_field() {
        let mut app = App::new("t");
        handle_key(&mut app, key(KeyCode::Char('i')));
        assert_eq!(app.mode, Mode::Edit);

        // letters that are shortcuts in normal mode are plain text here
        type_text(&mut app, "sud");
        handle_key(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "555");
        handle_key(&mut app, key(KeyCode::Backspace));

        assert_eq!(app.active_panel().fields(), &["sud", "55", ""]);
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn filter_mode_applies_on_enter() {
        let mut app = App::new("t");
        handle_key(&mut app, key(KeyCode::Char('/')));
        type_text(&mut app, "Ana");

        assert_eq!(handle_key(&mut app, key(KeyCode::Enter)), HandleResult::ApplyFilter);
        assert_eq!(app.active_panel().filter(), "Ana");
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut app = App::new("t");
        app.mode = Mode::Edit;
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut app, ctrl_c), HandleResult::Quit);
    }
}
