//! Coordinator between the item store, storage and the screen.
//!
//! Every handler runs the same sequence: read the form, check presence,
//! mutate the store, mirror the change to storage, then update the
//! presentation and reset the form.

use crate::error::{Result, StoreError, TrackerError};
use crate::item::{Item, ItemId};
use crate::persistence::{ItemRepository, Storage};
use crate::store::ItemStore;
use crate::view::{ItemInput, Presenter};

/// Application coordinator.
pub struct Tracker<S: Storage, P: Presenter> {
    store: ItemStore,
    repository: ItemRepository<S>,
    presenter: P,
}

impl<S: Storage, P: Presenter> Tracker<S, P> {
    /// Load the stored list and take ownership of the collaborators.
    pub fn new(repository: ItemRepository<S>, presenter: P) -> Self {
        let snapshot = repository.load();
        tracing::info!(
            slot = repository.slot(),
            items = snapshot.items.len(),
            next_id = snapshot.next_id,
            "Loaded stored items"
        );

        Self {
            store: ItemStore::from_snapshot(snapshot),
            repository,
            presenter,
        }
    }

    /// Bring the presentation in line with the loaded list.
    pub fn init(&mut self) {
        self.presenter.show_default_state();
        if self.store.is_empty() {
            self.presenter.hide_list();
        } else {
            self.presenter.populate_list(self.store.items());
        }
        self.update_total();
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn repository(&self) -> &ItemRepository<S> {
        &self.repository
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Add the meal described by the form.
    pub fn add_submit(&mut self) -> Result<Item> {
        let input = self.validated_input()?;

        let before = self.store.clone();
        let item = self
            .store
            .add(input.name.trim(), &input.calories)?
            .clone();
        if let Err(e) = self.repository.append(&item) {
            return Err(self.roll_back(before, e));
        }

        self.presenter.add_list_item(&item);
        self.update_total();
        self.presenter.clear_input();
        Ok(item)
    }

    /// Select a listed meal and switch the form to edit mode.
    pub fn edit_click(&mut self, id: ItemId) -> Result<Item> {
        let item = self.store.select(id)?.clone();
        tracing::debug!(id, "editing item");
        self.presenter.show_edit_state(&item);
        Ok(item)
    }

    /// Apply the form to the selected meal.
    pub fn update_submit(&mut self) -> Result<Item> {
        let input = self.validated_input()?;

        let before = self.store.clone();
        let item = self
            .store
            .update(input.name.trim(), &input.calories)?
            .clone();
        if let Err(e) = self.mirror_replace(&item) {
            return Err(self.roll_back(before, e));
        }

        self.presenter.update_list_item(&item);
        self.update_total();
        self.store.set_current(None);
        self.presenter.show_default_state();
        Ok(item)
    }

    /// Delete the selected meal.
    pub fn delete_submit(&mut self) -> Result<Item> {
        let id = self.store.current_id().ok_or(StoreError::NoSelection)?;

        let before = self.store.clone();
        let removed = self.store.remove(id)?;
        if let Err(e) = self.mirror_remove(id) {
            return Err(self.roll_back(before, e));
        }

        self.presenter.delete_list_item(id);
        self.presenter.show_default_state();
        self.update_total();
        Ok(removed)
    }

    /// Leave edit mode without saving.
    pub fn back(&mut self) {
        self.store.set_current(None);
        self.presenter.show_default_state();
    }

    /// Drop every meal and erase the stored list.
    pub fn clear_all(&mut self) -> Result<()> {
        let count = self.store.len();
        let before = self.store.clone();
        self.store.clear();
        if let Err(e) = self.repository.clear() {
            return Err(self.roll_back(before, e.into()));
        }

        self.update_total();
        self.presenter.hide_list();
        self.presenter.clear_list();
        self.presenter.show_default_state();
        tracing::info!(count, "Cleared all items");
        Ok(())
    }

    fn mirror_replace(&mut self, item: &Item) -> Result<()> {
        match self.repository.replace(item) {
            Err(TrackerError::Store(StoreError::NotFound(id))) => {
                tracing::warn!(id, "Stored list was missing the updated item, resyncing");
                self.repository.save_all(&self.store.snapshot())?;
                Ok(())
            }
            other => other,
        }
    }

    fn mirror_remove(&mut self, id: ItemId) -> Result<()> {
        match self.repository.remove(id) {
            Err(TrackerError::Store(StoreError::NotFound(id))) => {
                tracing::warn!(id, "Stored list was missing the deleted item, resyncing");
                self.repository.save_all(&self.store.snapshot())?;
                Ok(())
            }
            other => other.map(|_| ()),
        }
    }

    /// Restore the store after storage refused a change. The presenter was
    /// not touched yet, so it still matches the restored store.
    fn roll_back(&mut self, before: ItemStore, err: TrackerError) -> TrackerError {
        tracing::warn!("Storage write failed, keeping previous list: {}", err);
        self.store = before;
        err
    }

    fn update_total(&mut self) {
        let total = self.store.compute_total();
        self.presenter.show_total(total);
    }

    fn validated_input(&mut self) -> Result<ItemInput> {
        let input = self.presenter.item_input();
        if !input.is_complete() {
            self.presenter
                .notify(&TrackerError::MissingInput.to_string());
            return Err(TrackerError::MissingInput);
        }
        Ok(input)
    }
}
