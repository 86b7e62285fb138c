//! End-to-end flows through the tracker with real storage backends.

use std::cell::Cell;
use std::rc::Rc;

use mealtrack_core::{
    Calories, FileStorage, Item, ItemInput, ItemRepository, ListRow, MemoryStorage,
    PersistenceError, Presenter, Screen, Storage, Tracker, TrackerError, UiMode, DEFAULT_SLOT,
};

/// Memory storage whose writes can be switched off from outside the tracker.
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: Rc<Cell<bool>>,
}

impl Storage for FlakyStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.get() {
            return Err(PersistenceError::Io("disk full".to_string()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.get() {
            return Err(PersistenceError::Io("disk full".to_string()));
        }
        self.inner.remove_item(key)
    }
}

/// Store, screen and storage all describe the same list.
fn assert_in_step(tracker: &Tracker<FlakyStorage, Screen>) {
    let expected: Vec<String> = tracker
        .store()
        .items()
        .iter()
        .map(|item| ListRow::render(item).label())
        .collect();
    let shown: Vec<String> = tracker.presenter().rows().iter().map(ListRow::label).collect();
    assert_eq!(shown, expected);

    let sum: Calories = tracker.store().items().iter().map(|item| item.calories).sum();
    assert_eq!(tracker.store().total(), sum);
    assert_eq!(tracker.presenter().total(), sum);
    assert_eq!(tracker.repository().load().items, tracker.store().items());
}

fn type_form<S: Storage>(tracker: &mut Tracker<S, Screen>, name: &str, calories: &str) {
    *tracker.presenter_mut().form_mut() = ItemInput::new(name, calories);
}

fn memory_tracker() -> Tracker<MemoryStorage, Screen> {
    let mut tracker = Tracker::new(ItemRepository::new(MemoryStorage::new()), Screen::new());
    tracker.init();
    tracker
}

#[test]
fn test_breakfast_add_edit_delete() {
    let mut tracker = memory_tracker();

    type_form(&mut tracker, "Eggs", "100");
    let eggs = tracker.add_submit().unwrap();
    assert_eq!(eggs.id, 0);
    assert_eq!(tracker.store().total(), Calories::new(100));

    type_form(&mut tracker, "Toast", "200");
    let toast = tracker.add_submit().unwrap();
    assert_eq!(toast.id, 1);
    assert_eq!(tracker.store().total(), Calories::new(300));

    tracker.edit_click(0).unwrap();
    assert_eq!(tracker.presenter().mode(), UiMode::Editing);
    assert_eq!(tracker.presenter().title(), "Edit Eggs");
    assert_eq!(tracker.presenter().form(), &ItemInput::new("Eggs", "100"));

    type_form(&mut tracker, "Eggs Scrambled", "150");
    let updated = tracker.update_submit().unwrap();
    assert_eq!(updated, Item::new(0, "Eggs Scrambled", Calories::new(150)));
    assert_eq!(tracker.store().total(), Calories::new(350));
    assert_eq!(tracker.presenter().mode(), UiMode::Default);

    tracker.edit_click(1).unwrap();
    let removed = tracker.delete_submit().unwrap();
    assert_eq!(removed.id, 1);
    assert_eq!(tracker.store().items(), &[updated.clone()]);
    assert_eq!(tracker.store().total(), Calories::new(150));
    assert_eq!(tracker.store().current(), None);
    assert!(tracker.store().get(1).is_none());

    let stored = tracker.repository().load();
    assert_eq!(stored.items, vec![updated]);
    assert_eq!(tracker.presenter().total(), Calories::new(150));
    assert_eq!(tracker.presenter().rows().len(), 1);
}

#[test]
fn test_empty_calories_never_reaches_store() {
    let mut tracker = memory_tracker();
    type_form(&mut tracker, "Snack", "");

    assert!(matches!(
        tracker.add_submit(),
        Err(TrackerError::MissingInput)
    ));
    assert!(tracker.store().is_empty());
    assert_eq!(tracker.repository().storage().get_item(DEFAULT_SLOT).unwrap(), None);
}

#[test]
fn test_total_stays_consistent_through_mutations() {
    let mut tracker = memory_tracker();
    for (name, calories) in [("a", "10"), ("b", "20"), ("c", "30")] {
        type_form(&mut tracker, name, calories);
        tracker.add_submit().unwrap();
    }

    let sum = |tracker: &Tracker<MemoryStorage, Screen>| -> Calories {
        tracker.store().items().iter().map(|item| item.calories).sum()
    };
    assert_eq!(tracker.presenter().total(), sum(&tracker));

    tracker.edit_click(1).unwrap();
    type_form(&mut tracker, "b", "25");
    tracker.update_submit().unwrap();
    assert_eq!(tracker.presenter().total(), sum(&tracker));
    assert_eq!(tracker.presenter().total(), Calories::new(65));

    tracker.edit_click(0).unwrap();
    tracker.delete_submit().unwrap();
    assert_eq!(tracker.presenter().total(), Calories::new(55));

    tracker.clear_all().unwrap();
    assert_eq!(tracker.presenter().total(), Calories::ZERO);
    assert!(!tracker.presenter().is_list_visible());
    assert!(tracker.presenter().rows().is_empty());
}

#[test]
fn test_reload_continues_after_persisted_watermark() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = Tracker::new(ItemRepository::new(FileStorage::new(dir.path())), Screen::new());
    first.init();
    for name in ["a", "b", "c"] {
        type_form(&mut first, name, "1");
        first.add_submit().unwrap();
    }
    first.edit_click(2).unwrap();
    first.delete_submit().unwrap();
    drop(first);

    let mut second = Tracker::new(ItemRepository::new(FileStorage::new(dir.path())), Screen::new());
    second.init();
    assert_eq!(second.store().len(), 2);
    assert!(second.presenter().is_list_visible());
    assert_eq!(second.presenter().total(), Calories::new(2));

    type_form(&mut second, "d", "1");
    assert_eq!(second.add_submit().unwrap().id, 3);
}

#[test]
fn test_clear_all_erases_storage_and_resets_ui() {
    let mut tracker = memory_tracker();
    type_form(&mut tracker, "Eggs", "100");
    tracker.add_submit().unwrap();
    tracker.edit_click(0).unwrap();

    tracker.clear_all().unwrap();
    assert_eq!(tracker.presenter().mode(), UiMode::Default);
    assert_eq!(tracker.store().current_id(), None);
    assert_eq!(tracker.repository().storage().get_item(DEFAULT_SLOT).unwrap(), None);

    type_form(&mut tracker, "Toast", "200");
    assert_eq!(tracker.add_submit().unwrap().id, 1);
}

#[test]
fn test_corrupt_storage_starts_empty() {
    let mut storage = MemoryStorage::new();
    storage.set_item(DEFAULT_SLOT, "not json at all").unwrap();

    let mut tracker = Tracker::new(ItemRepository::new(storage), Screen::new());
    tracker.init();
    assert!(tracker.store().is_empty());
    assert!(!tracker.presenter().is_list_visible());

    type_form(&mut tracker, "Eggs", "100");
    tracker.add_submit().unwrap();
    assert_eq!(tracker.repository().load().items.len(), 1);
}

#[test]
fn test_non_numeric_calories_show_nan_total() {
    let mut tracker = memory_tracker();
    type_form(&mut tracker, "Eggs", "100");
    tracker.add_submit().unwrap();
    type_form(&mut tracker, "Mystery", "lots");
    tracker.add_submit().unwrap();

    assert!(tracker.presenter().total().is_nan());
    assert_eq!(tracker.presenter().rows()[1].label(), "Mystery: NaN Calories");

    // The sentinel survives a round trip through storage
    let stored = tracker.repository().load();
    assert!(stored.items[1].calories.is_nan());
}

#[test]
fn test_presenter_notice_can_be_dismissed() {
    let mut tracker = memory_tracker();
    type_form(&mut tracker, "", "100");
    let _ = tracker.add_submit();
    assert!(tracker.presenter().notice().is_some());

    tracker.presenter_mut().dismiss_notice();
    assert!(tracker.presenter().notice().is_none());
    tracker.presenter_mut().notify("saved");
    assert_eq!(tracker.presenter().notice(), Some("saved"));
}

#[test]
fn test_failed_writes_leave_store_and_screen_in_step() {
    let storage = FlakyStorage::default();
    let fail_writes = Rc::clone(&storage.fail_writes);
    let mut tracker = Tracker::new(ItemRepository::new(storage), Screen::new());
    tracker.init();
    type_form(&mut tracker, "Eggs", "100");
    tracker.add_submit().unwrap();
    type_form(&mut tracker, "Toast", "200");
    tracker.add_submit().unwrap();

    fail_writes.set(true);

    type_form(&mut tracker, "Pie", "300");
    let err = tracker.add_submit().unwrap_err();
    assert!(matches!(err, TrackerError::Persistence(PersistenceError::Io(_))));
    assert_eq!(tracker.store().len(), 2);
    assert_eq!(tracker.store().next_id(), 2);
    assert_in_step(&tracker);

    tracker.edit_click(0).unwrap();
    type_form(&mut tracker, "Eggs", "150");
    assert!(tracker.update_submit().is_err());
    assert_eq!(tracker.store().get(0).unwrap().calories, Calories::new(100));
    assert_eq!(tracker.store().current_id(), Some(0));
    assert_eq!(tracker.presenter().mode(), UiMode::Editing);
    assert_in_step(&tracker);

    assert!(tracker.delete_submit().is_err());
    assert_eq!(tracker.store().len(), 2);
    assert_eq!(tracker.store().current_id(), Some(0));
    assert_in_step(&tracker);

    tracker.back();
    assert!(tracker.clear_all().is_err());
    assert_eq!(tracker.store().len(), 2);
    assert!(tracker.presenter().is_list_visible());
    assert_in_step(&tracker);

    fail_writes.set(false);
    type_form(&mut tracker, "Pie", "300");
    assert_eq!(tracker.add_submit().unwrap().id, 2);
    assert_in_step(&tracker);
}

#[test]
fn test_stored_max_id_starts_empty() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(
            DEFAULT_SLOT,
            r#"[{"id":18446744073709551615,"name":"Eggs","calories":100}]"#,
        )
        .unwrap();

    let mut tracker = Tracker::new(ItemRepository::new(storage), Screen::new());
    tracker.init();
    assert!(tracker.store().is_empty());

    type_form(&mut tracker, "Toast", "200");
    assert_eq!(tracker.add_submit().unwrap().id, 0);
}

#[test]
fn test_stored_max_counter_starts_empty() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(DEFAULT_SLOT, r#"{"next_id":18446744073709551615,"items":[]}"#)
        .unwrap();

    let mut tracker = Tracker::new(ItemRepository::new(storage), Screen::new());
    tracker.init();
    assert_eq!(tracker.store().next_id(), 0);

    type_form(&mut tracker, "Toast", "200");
    assert_eq!(tracker.add_submit().unwrap().id, 0);
    assert_eq!(tracker.repository().load().next_id, 1);
}
