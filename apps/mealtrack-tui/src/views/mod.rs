//! TUI views

mod form_view;
mod item_list;

pub use form_view::{FormView, FORM_HEIGHT};
pub use item_list::ItemListView;
