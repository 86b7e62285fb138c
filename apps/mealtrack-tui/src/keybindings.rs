//! Keybinding definitions

use crossterm::event::{KeyCode, KeyModifiers};
use mealtrack_core::UiMode;

/// Keybinding action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application
    Quit,
    /// Add the meal in the form
    Add,
    /// Save the form over the meal being edited
    Update,
    /// Delete the meal being edited
    Delete,
    /// Leave edit mode without saving
    Back,
    /// Edit the meal under the list cursor
    Edit,
    /// Clear every meal (asks for confirmation)
    ClearAll,
    /// Switch between the name and calories inputs
    NextField,
    /// Move up in list
    MoveUp,
    /// Move down in list
    MoveDown,
    /// Toggle help
    ToggleHelp,
    /// Type a character into the focused input
    Input(char),
    /// Delete the last character of the focused input
    Backspace,
}

/// Get the action for a key in the given UI mode
pub fn action_for(mode: UiMode, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('e') => Some(Action::Edit),
            KeyCode::Char('d') if mode == UiMode::Editing => Some(Action::Delete),
            KeyCode::Char('l') => Some(Action::ClearAll),
            _ => None,
        };
    }

    match code {
        // Enter never adds while editing, so an edit cannot spawn a duplicate
        KeyCode::Enter => Some(match mode {
            UiMode::Default => Action::Add,
            UiMode::Editing => Action::Update,
        }),
        KeyCode::Esc => Some(match mode {
            UiMode::Default => Action::Quit,
            UiMode::Editing => Action::Back,
        }),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::NextField),
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::F(1) => Some(Action::ToggleHelp),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) => Some(Action::Input(c)),
        _ => None,
    }
}
