//! Application state and main render loop

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use mealtrack_core::{Presenter, Screen, Storage, Tracker, TrackerError, UiMode};

use crate::focus::Focus;
use crate::keybindings::{action_for, Action};
use crate::views::{FormView, ItemListView, FORM_HEIGHT};
use crate::widgets::ModeIndicator;

/// Main application state
pub struct App<S: Storage> {
    /// Store, storage and screen, sequenced by the coordinator
    pub tracker: Tracker<S, Screen>,
    /// Input receiving typed characters
    pub focus: Focus,
    /// Waiting for `y` to confirm clearing everything
    pub confirm_clear: bool,
    /// Whether to show the help overlay
    pub show_help: bool,
    pub form_view: FormView,
    pub list_view: ItemListView,
}

impl<S: Storage> App<S> {
    /// Create a new application instance around a loaded tracker
    pub fn new(mut tracker: Tracker<S, Screen>) -> Self {
        tracker.init();
        Self {
            tracker,
            focus: Focus::Name,
            confirm_clear: false,
            show_help: false,
            form_view: FormView::new(),
            list_view: ItemListView::new(),
        }
    }

    fn screen(&self) -> &Screen {
        self.tracker.presenter()
    }

    /// Render the application
    pub fn render(&self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),           // Status bar
                Constraint::Length(FORM_HEIGHT), // Form
                Constraint::Min(3),              // Meal list
                Constraint::Length(3),           // Total
                Constraint::Length(1),           // Notice line
            ])
            .split(size);

        self.render_status_bar(frame, chunks[0]);
        self.form_view
            .render(frame, chunks[1], self.screen(), self.focus);
        self.list_view.render(
            frame,
            chunks[2],
            self.screen().rows(),
            self.screen().is_list_visible(),
            self.tracker.store().current_id(),
        );
        self.render_total(frame, chunks[3]);
        self.render_notice_line(frame, chunks[4]);

        if self.show_help {
            self.render_help_overlay(frame, size);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let count = self.tracker.store().len();
        let line = Line::from(vec![
            ModeIndicator::new(self.screen().mode()).as_span(),
            Span::styled(" mealtrack ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                "| {} meal{} | F1 for help",
                count,
                if count == 1 { "" } else { "s" }
            )),
        ]);

        let status_bar = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status_bar, area);
    }

    fn render_total(&self, frame: &mut Frame, area: Rect) {
        let total = self.screen().total();
        let value_style = if total.is_nan() {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        };

        let line = Line::from(vec![
            Span::raw("Total Calories: "),
            Span::styled(total.to_string(), value_style),
        ]);
        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn render_notice_line(&self, frame: &mut Frame, area: Rect) {
        let line = if self.confirm_clear {
            Line::from(Span::styled(
                "Clear all meals? Press y to confirm, any other key to cancel",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
        } else if let Some(notice) = self.screen().notice() {
            Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Yellow),
            ))
        } else {
            Line::from(match self.screen().mode() {
                UiMode::Default => "Tab switch field | Up/Down select | Ctrl-E edit | Esc quit",
                UiMode::Editing => "Enter update | Ctrl-D delete | Esc back",
            })
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_text = r#"
mealtrack - Help

Form:
  Tab       - Switch between meal and calories
  Enter     - Add meal (or save while editing)
  Backspace - Delete last character

List:
  Up/Down   - Move the cursor
  Ctrl-E    - Edit the meal under the cursor

While editing:
  Enter     - Save changes
  Ctrl-D    - Delete the meal
  Esc       - Back without saving

Other:
  Ctrl-L    - Clear all meals
  F1        - Toggle this help
  Esc       - Quit (when not editing)
  Ctrl-C    - Quit
"#;

        let block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Black));

        let help_area = centered_rect(60, 80, area);
        frame.render_widget(ratatui::widgets::Clear, help_area);
        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, help_area);
    }

    /// Handle a key press, returns true if app should quit
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.tracker.presenter_mut().dismiss_notice();

        if self.confirm_clear {
            self.confirm_clear = false;
            if matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.clear_all();
            } else {
                self.notify("Clear cancelled");
            }
            return false;
        }

        match action_for(self.screen().mode(), code, modifiers) {
            Some(action) => self.apply(action),
            None => false,
        }
    }

    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Add => self.add(),
            Action::Update => self.update(),
            Action::Delete => self.delete(),
            Action::Back => {
                self.tracker.back();
                self.focus = Focus::Name;
            }
            Action::Edit => self.edit_selected(),
            Action::ClearAll => {
                if self.tracker.store().is_empty() {
                    self.notify("Nothing to clear");
                } else {
                    self.confirm_clear = true;
                }
            }
            Action::NextField => self.focus = self.focus.next(),
            Action::MoveUp => {
                let count = self.screen().rows().len();
                self.list_view.prev(count);
            }
            Action::MoveDown => {
                let count = self.screen().rows().len();
                self.list_view.next(count);
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Input(c) => self.focused_field().push(c),
            Action::Backspace => {
                self.focused_field().pop();
            }
        }
        false
    }

    fn add(&mut self) {
        match self.tracker.add_submit() {
            Ok(item) => {
                self.list_view.selected = self.screen().rows().len().saturating_sub(1);
                self.focus = Focus::Name;
                self.notify(&format!("Added {}", item.name));
            }
            Err(e) => self.report(e),
        }
    }

    fn update(&mut self) {
        match self.tracker.update_submit() {
            Ok(item) => {
                self.focus = Focus::Name;
                self.notify(&format!("Updated {}", item.name));
            }
            Err(e) => self.report(e),
        }
    }

    fn delete(&mut self) {
        match self.tracker.delete_submit() {
            Ok(item) => {
                let count = self.screen().rows().len();
                self.list_view.clamp(count);
                self.focus = Focus::Name;
                self.notify(&format!("Deleted {}", item.name));
            }
            Err(e) => self.report(e),
        }
    }

    fn edit_selected(&mut self) {
        let Some(id) = self.list_view.selected_id(self.screen().rows()) else {
            self.notify("No meal to edit");
            return;
        };

        match self.tracker.edit_click(id) {
            Ok(_) => self.focus = Focus::Name,
            Err(e) => self.report(e),
        }
    }

    fn clear_all(&mut self) {
        match self.tracker.clear_all() {
            Ok(()) => {
                self.list_view.clamp(0);
                self.focus = Focus::Name;
                self.notify("All meals cleared");
            }
            Err(e) => self.report(e),
        }
    }

    fn focused_field(&mut self) -> &mut String {
        let form = self.tracker.presenter_mut().form_mut();
        match self.focus {
            Focus::Name => &mut form.name,
            Focus::Calories => &mut form.calories,
        }
    }

    fn notify(&mut self, message: &str) {
        self.tracker.presenter_mut().notify(message);
    }

    fn report(&mut self, err: TrackerError) {
        // The tracker already put the missing-input notice on screen
        if !matches!(err, TrackerError::MissingInput) {
            tracing::warn!("{}", err);
            self.notify(&err.to_string());
        }
    }
}

/// Helper function to create a centered rect
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
