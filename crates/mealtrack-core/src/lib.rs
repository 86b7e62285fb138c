//! mealtrack-core: meal list state, storage sync and presentation model.
//!
//! The [`ItemStore`] owns the list of meals, the current edit selection and the
//! cached calorie total. [`ItemRepository`] mirrors that list into a named
//! storage slot, and [`Tracker`] sequences each user action as
//! mutate → persist → present.

pub mod config;
pub mod error;
pub mod item;
pub mod persistence;
pub mod store;
pub mod tracker;
pub mod view;

pub use config::*;
pub use error::*;
pub use item::*;
pub use persistence::*;
pub use store::*;
pub use tracker::*;
pub use view::*;
