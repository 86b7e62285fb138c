//! Meal list panel

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use mealtrack_core::{ItemId, ListRow};

/// Item list view state
pub struct ItemListView {
    /// Row under the cursor
    pub selected: usize,
}

impl ItemListView {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    /// Render the list. Hidden lists show a placeholder instead of rows.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        rows: &[ListRow],
        visible: bool,
        editing: Option<ItemId>,
    ) {
        let block = Block::default()
            .title(format!("Meals ({})", rows.len()))
            .borders(Borders::ALL);

        if !visible || rows.is_empty() {
            let paragraph = Paragraph::new("No meals yet. Type a meal and its calories, then press Enter.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| {
                let marker = if editing == Some(row.id) { "*" } else { " " };

                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} ", marker)),
                    Span::styled(
                        format!("{}: ", row.name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        row.calories.clone(),
                        Style::default().add_modifier(Modifier::ITALIC),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    /// Id of the row under the cursor
    pub fn selected_id(&self, rows: &[ListRow]) -> Option<ItemId> {
        rows.get(self.selected).map(|row| row.id)
    }

    /// Move the cursor down, wrapping at the end
    pub fn next(&mut self, count: usize) {
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    /// Move the cursor up, wrapping at the start
    pub fn prev(&mut self, count: usize) {
        if count > 0 {
            if self.selected > 0 {
                self.selected -= 1;
            } else {
                self.selected = count - 1;
            }
        }
    }

    /// Keep the cursor inside a list that shrank
    pub fn clamp(&mut self, count: usize) {
        self.selected = self.selected.min(count.saturating_sub(1));
    }
}

impl Default for ItemListView {
    fn default() -> Self {
        Self::new()
    }
}
