use crate::error::StoreError;
use crate::item::{Calories, Item, ItemId};
use crate::persistence::Snapshot;

/// Canonical in-memory list of meals.
///
/// Owns the collection, the item currently being edited and the cached total.
/// It never touches storage or the screen; [`crate::Tracker`] mirrors its
/// changes outward.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    current: Option<ItemId>,
    total: Calories,
    next_id: ItemId,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from a stored snapshot.
    ///
    /// The id counter is raised past every stored id so a legacy or edited
    /// snapshot cannot hand out a duplicate.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let next_id = snapshot.next_id.max(watermark(&snapshot.items));
        let mut store = Self {
            items: snapshot.items,
            current: None,
            total: Calories::ZERO,
            next_id,
        };
        store.compute_total();
        store
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id the next `add` will assign.
    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    /// Append a new item. Performs no validation; presence checks belong to
    /// the caller.
    pub fn add(&mut self, name: &str, raw_calories: &str) -> Result<&Item, StoreError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;

        let item = Item::new(id, name, Calories::parse(raw_calories));
        tracing::debug!(id, name, calories = %item.calories, "item added");
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Rewrite the name and calories of the selected item in place.
    pub fn update(&mut self, name: &str, raw_calories: &str) -> Result<&Item, StoreError> {
        let id = self.current.ok_or(StoreError::NoSelection)?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;

        item.name = name.to_string();
        item.calories = Calories::parse(raw_calories);
        tracing::debug!(id, name, calories = %item.calories, "item updated");
        Ok(&*item)
    }

    /// Remove the item with `id`, resolving its position at call time.
    ///
    /// The selection is cleared whether or not the id was found.
    pub fn remove(&mut self, id: ItemId) -> Result<Item, StoreError> {
        self.current = None;

        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;

        tracing::debug!(id, "item removed");
        Ok(self.items.remove(index))
    }

    /// Empty the collection and drop the selection. The id counter is kept.
    pub fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }

    pub fn set_current(&mut self, id: Option<ItemId>) {
        self.current = id;
    }

    /// Select the item with `id` for editing.
    pub fn select(&mut self, id: ItemId) -> Result<&Item, StoreError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;
        self.current = Some(id);
        Ok(&self.items[index])
    }

    pub fn current_id(&self) -> Option<ItemId> {
        self.current
    }

    /// The selected item, resolved against the current collection.
    pub fn current(&self) -> Option<&Item> {
        self.current.and_then(|id| self.get(id))
    }

    /// Sum every item's calories and cache the result.
    pub fn compute_total(&mut self) -> Calories {
        self.total = self.items.iter().map(|item| item.calories).sum();
        self.total
    }

    /// Total from the last `compute_total` call.
    pub fn total(&self) -> Calories {
        self.total
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            next_id: self.next_id,
            items: self.items.clone(),
        }
    }
}

/// Smallest id greater than every id in `items`, saturating at `ItemId::MAX`.
pub(crate) fn watermark(items: &[Item]) -> ItemId {
    items
        .iter()
        .map(|item| item.id.saturating_add(1))
        .max()
        .unwrap_or(0)
}
