//! Presentation model.
//!
//! [`Presenter`] is the narrow contract the coordinator drives. [`Screen`] is
//! the in-memory implementation that a front end reads when it draws; it holds
//! no state of consequence beyond what it was last told to show.

use std::fmt;

use crate::item::{Calories, Item, ItemId};

/// Form title outside of edit mode.
pub const DEFAULT_TITLE: &str = "Add Meal / Food Item";

/// Two-state UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Adding new meals (initial state)
    Default,
    /// Editing the selected meal
    Editing,
}

impl Default for UiMode {
    fn default() -> Self {
        UiMode::Default
    }
}

impl fmt::Display for UiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiMode::Default => write!(f, "DEFAULT"),
            UiMode::Editing => write!(f, "EDITING"),
        }
    }
}

impl UiMode {
    /// Returns a short code for compact display.
    pub fn short_code(&self) -> &'static str {
        match self {
            UiMode::Default => "ADD",
            UiMode::Editing => "EDIT",
        }
    }
}

/// Raw form contents, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub calories: String,
}

impl ItemInput {
    pub fn new(name: impl Into<String>, calories: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calories: calories.into(),
        }
    }

    /// Both fields hold something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.calories.trim().is_empty()
    }
}

/// Which form controls are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormControls {
    pub add: bool,
    pub update: bool,
    pub delete: bool,
    pub back: bool,
}

impl FormControls {
    pub fn for_mode(mode: UiMode) -> Self {
        let editing = mode == UiMode::Editing;
        Self {
            add: !editing,
            update: editing,
            delete: editing,
            back: editing,
        }
    }
}

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: ItemId,
    /// Stable element id, `item-{id}`
    pub element_id: String,
    pub name: String,
    pub calories: String,
}

impl ListRow {
    pub fn render(item: &Item) -> Self {
        Self {
            id: item.id,
            element_id: format!("item-{}", item.id),
            name: item.name.clone(),
            calories: format!("{} Calories", item.calories),
        }
    }

    pub fn label(&self) -> String {
        format!("{}: {}", self.name, self.calories)
    }
}

/// Render the full collection.
pub fn render_rows(items: &[Item]) -> Vec<ListRow> {
    items.iter().map(ListRow::render).collect()
}

/// Operations the coordinator needs from a front end.
pub trait Presenter {
    fn populate_list(&mut self, items: &[Item]);
    fn add_list_item(&mut self, item: &Item);
    fn update_list_item(&mut self, item: &Item);
    fn delete_list_item(&mut self, id: ItemId);
    fn clear_list(&mut self);
    fn hide_list(&mut self);

    /// Current form contents as raw strings.
    fn item_input(&self) -> ItemInput;
    fn populate_form(&mut self, item: &Item);
    fn clear_input(&mut self);

    fn show_total(&mut self, total: Calories);
    fn show_default_state(&mut self);
    fn show_edit_state(&mut self, item: &Item);

    /// Transient user-facing message.
    fn notify(&mut self, message: &str);
}

/// Presentation state read by the terminal front end.
#[derive(Debug, Clone)]
pub struct Screen {
    rows: Vec<ListRow>,
    list_visible: bool,
    form: ItemInput,
    mode: UiMode,
    title: String,
    total: Calories,
    notice: Option<String>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            list_visible: true,
            form: ItemInput::default(),
            mode: UiMode::Default,
            title: DEFAULT_TITLE.to_string(),
            total: Calories::ZERO,
            notice: None,
        }
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn is_list_visible(&self) -> bool {
        self.list_visible
    }

    pub fn form(&self) -> &ItemInput {
        &self.form
    }

    /// Direct access for typing into the form.
    pub fn form_mut(&mut self) -> &mut ItemInput {
        &mut self.form
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn total(&self) -> Calories {
        self.total
    }

    pub fn controls(&self) -> FormControls {
        FormControls::for_mode(self.mode)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

impl Presenter for Screen {
    fn populate_list(&mut self, items: &[Item]) {
        self.rows = render_rows(items);
        self.list_visible = true;
    }

    fn add_list_item(&mut self, item: &Item) {
        self.list_visible = true;
        self.rows.push(ListRow::render(item));
    }

    fn update_list_item(&mut self, item: &Item) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == item.id) {
            *row = ListRow::render(item);
        }
    }

    fn delete_list_item(&mut self, id: ItemId) {
        self.rows.retain(|row| row.id != id);
        if self.rows.is_empty() {
            self.hide_list();
        }
    }

    fn clear_list(&mut self) {
        self.rows.clear();
    }

    fn hide_list(&mut self) {
        self.list_visible = false;
    }

    fn item_input(&self) -> ItemInput {
        self.form.clone()
    }

    fn populate_form(&mut self, item: &Item) {
        self.form = ItemInput::new(item.name.clone(), item.calories.to_string());
    }

    fn clear_input(&mut self) {
        self.form = ItemInput::default();
    }

    fn show_total(&mut self, total: Calories) {
        self.total = total;
    }

    fn show_default_state(&mut self) {
        self.clear_input();
        self.title = DEFAULT_TITLE.to_string();
        self.mode = UiMode::Default;
    }

    fn show_edit_state(&mut self, item: &Item) {
        self.title = format!("Edit {}", item.name);
        self.populate_form(item);
        self.mode = UiMode::Editing;
    }

    fn notify(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }
}
