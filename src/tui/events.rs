//! # Module: TUI Event Handling
//!
//! ## Responsibility
//! Polls crossterm events and translates keyboard input into app state
//! mutations. Serial actions are handed back to the caller, which owns the
//! runtime needed to await them.
//!
//! ## Guarantees
//! - Non-blocking event polling with configurable timeout
//! - No panics on any key combination
//! - Ctrl+C always triggers quit, in every mode

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, EditTarget, InputMode, SerialCommand};

/// Result of polling for a terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Exit the dashboard.
    Quit,
    /// Toggle the help overlay.
    Help,
    /// Pause or resume the simulators.
    Pause,
    /// Switch between overview and browser.
    NextView,
    /// Connect to a serial port.
    Connect,
    /// Disconnect from the serial port.
    Disconnect,
    /// Start editing the given input line.
    BeginEdit(EditTarget),
    /// Start or stop the basic proxy feed.
    ToggleProxy,
    /// Clear the basic proxy log.
    ClearProxy,
    /// Cycle the advanced feed's category filter.
    CycleCategory,
    /// Open a browser tab.
    NewTab,
    /// Close the active browser tab.
    CloseTab,
    /// Activate the previous browser tab.
    PrevTab,
    /// Activate the next browser tab.
    NextTab,
    /// Reload the active browser tab.
    Reload,
    /// Send the active browser tab home.
    Home,
    /// Scroll the serial log towards older messages.
    ScrollUp,
    /// Scroll the serial log towards newer messages.
    ScrollDown,
    /// Typed character while editing.
    Char(char),
    /// Delete the last character while editing.
    Backspace,
    /// Apply the input line.
    Submit,
    /// Abandon the input line.
    Cancel,
    /// A terminal resize occurred.
    Resize(u16, u16),
    /// No actionable event within the poll window.
    None,
}

/// Polls for a single input event with the given timeout.
///
/// # Arguments
/// * `timeout` - Maximum time to wait for an event.
/// * `mode` - Current keyboard mode; decides how keys are read.
///
/// # Returns
/// The detected `InputEvent`, or `InputEvent::None` if no event occurred.
/// Crossterm polling errors are reported as `InputEvent::None`.
pub fn poll_event(timeout: Duration, mode: InputMode) -> InputEvent {
    let available = match event::poll(timeout) {
        Ok(v) => v,
        Err(_) => return InputEvent::None,
    };
    if !available {
        return InputEvent::None;
    }

    match event::read() {
        Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => translate_key(key, mode),
        Ok(Event::Resize(w, h)) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

/// Applies an input event to the app state.
///
/// # Arguments
/// * `app` - Mutable reference to app state.
/// * `event` - The input event to apply.
///
/// # Returns
/// A serial action for the caller to run, if the event asked for one.
pub fn apply_event(app: &mut App, event: InputEvent) -> Option<SerialCommand> {
    if app.show_help {
        match event {
            InputEvent::Quit => app.should_quit = true,
            InputEvent::Resize(_, _) | InputEvent::None => {}
            // Any other key closes the overlay.
            _ => app.show_help = false,
        }
        return None;
    }

    match event {
        InputEvent::Quit => app.should_quit = true,
        InputEvent::Help => app.show_help = true,
        InputEvent::Pause => app.paused = !app.paused,
        InputEvent::NextView => app.view = app.view.next(),
        InputEvent::Connect => return Some(SerialCommand::Connect),
        InputEvent::Disconnect => return Some(SerialCommand::Disconnect),
        InputEvent::BeginEdit(target) => app.begin_edit(target),
        InputEvent::ToggleProxy => app.toggle_proxy(),
        InputEvent::ClearProxy => app.clear_proxy(),
        InputEvent::CycleCategory => {
            app.advanced_feed.cycle_category();
        }
        InputEvent::NewTab => {
            app.browser.new_tab();
        }
        InputEvent::CloseTab => {
            app.browser.close_active();
        }
        InputEvent::PrevTab => app.browser.prev_tab(),
        InputEvent::NextTab => app.browser.next_tab(),
        InputEvent::Reload => app.reload(),
        InputEvent::Home => app.home(),
        InputEvent::ScrollUp => app.scroll_serial_up(),
        InputEvent::ScrollDown => app.scroll_serial_down(),
        InputEvent::Char(c) => app.push_char(c),
        InputEvent::Backspace => app.pop_char(),
        InputEvent::Submit => return app.submit_edit(),
        InputEvent::Cancel => app.cancel_edit(),
        InputEvent::Resize(_, _) | InputEvent::None => {}
    }
    None
}

/// Translates a crossterm key event to an `InputEvent`.
pub fn translate_key(key: KeyEvent, mode: InputMode) -> InputEvent {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputEvent::Quit;
    }

    match mode {
        InputMode::Editing(_) => match key.code {
            KeyCode::Enter => InputEvent::Submit,
            KeyCode::Esc => InputEvent::Cancel,
            KeyCode::Backspace => InputEvent::Backspace,
            KeyCode::Char(c) => InputEvent::Char(c),
            _ => InputEvent::None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputEvent::Quit,
            KeyCode::Char('h') | KeyCode::Char('?') => InputEvent::Help,
            KeyCode::Char('p') | KeyCode::Char('P') => InputEvent::Pause,
            KeyCode::Tab => InputEvent::NextView,
            KeyCode::Char('c') => InputEvent::Connect,
            KeyCode::Char('d') => InputEvent::Disconnect,
            KeyCode::Char('i') => InputEvent::BeginEdit(EditTarget::Command),
            KeyCode::Char('/') => InputEvent::BeginEdit(EditTarget::Filter),
            KeyCode::Char('u') => InputEvent::BeginEdit(EditTarget::TargetUrl),
            KeyCode::Char('g') => InputEvent::BeginEdit(EditTarget::Address),
            KeyCode::Char('s') => InputEvent::ToggleProxy,
            KeyCode::Char('x') => InputEvent::ClearProxy,
            KeyCode::Char('f') => InputEvent::CycleCategory,
            KeyCode::Char('t') => InputEvent::NewTab,
            KeyCode::Char('w') => InputEvent::CloseTab,
            KeyCode::Char('[') => InputEvent::PrevTab,
            KeyCode::Char(']') => InputEvent::NextTab,
            KeyCode::Char('r') => InputEvent::Reload,
            KeyCode::Char('H') => InputEvent::Home,
            KeyCode::Up => InputEvent::ScrollUp,
            KeyCode::Down => InputEvent::ScrollDown,
            _ => InputEvent::None,
        },
    }
}
