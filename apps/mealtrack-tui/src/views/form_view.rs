//! Add/edit form panel

use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use unicode_width::UnicodeWidthStr;

use mealtrack_core::{FormControls, Screen, UiMode};

use crate::focus::Focus;

const NAME_LABEL: &str = "Meal:     ";
const CALORIES_LABEL: &str = "Calories: ";

/// Height of the form including borders
pub const FORM_HEIGHT: u16 = 5;

/// Form view
pub struct FormView;

impl FormView {
    pub fn new() -> Self {
        Self
    }

    /// Render the form and place the terminal cursor in the focused input
    pub fn render(&self, frame: &mut Frame, area: Rect, screen: &Screen, focus: Focus) {
        let title_style = match screen.mode() {
            UiMode::Default => Style::default().fg(Color::Cyan),
            UiMode::Editing => Style::default().fg(Color::Yellow),
        };
        let block = Block::default()
            .title(Span::styled(
                screen.title().to_string(),
                title_style.add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL);
        let inner = block.inner(area);

        let form = screen.form();
        let lines = vec![
            input_line(NAME_LABEL, &form.name, focus == Focus::Name),
            input_line(CALORIES_LABEL, &form.calories, focus == Focus::Calories),
            controls_line(screen.controls()),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);

        let (row, text) = match focus {
            Focus::Name => (0, &form.name),
            Focus::Calories => (1, &form.calories),
        };
        if let Some(x) = cursor_x(inner, text) {
            if inner.height > row {
                frame.set_cursor_position(Position::new(x, inner.y + row));
            }
        }
    }
}

/// Column just past `text` in an input line, or `None` when it falls
/// outside `inner`.
fn cursor_x(inner: Rect, text: &str) -> Option<u16> {
    let offset = NAME_LABEL.width().saturating_add(text.width());
    let offset = u16::try_from(offset).ok()?;
    let x = inner.x.saturating_add(offset);
    (x < inner.right()).then_some(x)
}

impl Default for FormView {
    fn default() -> Self {
        Self::new()
    }
}

fn input_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default().add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::styled(value, value_style),
    ])
}

/// Key hints for the controls visible in the current mode
fn controls_line(controls: FormControls) -> Line<'static> {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();

    if controls.add {
        spans.push(Span::styled("[Enter]", key));
        spans.push(Span::raw(" Add Meal  "));
    }
    if controls.update {
        spans.push(Span::styled("[Enter]", key));
        spans.push(Span::raw(" Update  "));
    }
    if controls.delete {
        spans.push(Span::styled("[Ctrl-D]", key));
        spans.push(Span::raw(" Delete  "));
    }
    if controls.back {
        spans.push(Span::styled("[Esc]", key));
        spans.push(Span::raw(" Back  "));
    }
    spans.push(Span::styled("[Ctrl-L]", key));
    spans.push(Span::raw(" Clear All"));

    Line::from(spans)
}
