#[cfg(test)]
mod tests {
    use crate::config::StoreConfig;
    use crate::error::StoreError;
    use crate::model::task::{Priority, Task, TaskId};
    use crate::repository::{keys, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
    use crate::service::task_store::TaskStore;

    /// Storage that already went through its first visit, so no samples.
    fn visited() -> MemoryKeyValueStore {
        MemoryKeyValueStore::with_slots([(keys::FIRST_VISIT, "true")])
    }

    fn reload(storage: &MemoryKeyValueStore) -> Vec<Task> {
        let mut store = TaskStore::new(storage);
        store.load().unwrap().to_vec()
    }

    #[test]
    fn test_first_load_seeds_three_samples_once() {
        let storage = MemoryKeyValueStore::new();
        let mut store = TaskStore::new(&storage);

        let tasks = store.load().unwrap().to_vec();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks.iter().filter(|t| t.completed).count(), 1);
        assert!(tasks.iter().any(|t| !t.completed && t.priority == Priority::Normal));
        assert!(tasks.iter().any(|t| !t.completed && t.priority == Priority::High));
        assert!(tasks.iter().any(|t| t.completed && t.priority == Priority::Low));
        assert_eq!(storage.get(keys::FIRST_VISIT).unwrap().as_deref(), Some("true"));

        store.clear_all().unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(reload(&storage).is_empty());
    }

    #[test]
    fn test_existing_tasks_are_not_replaced_by_samples() {
        let raw = r#"[{"id":"x1","text":"Mine","completed":false,"priority":"high","createdAt":"2025-01-01T00:00:00Z"}]"#;
        let storage = MemoryKeyValueStore::with_slots([(keys::TASKS, raw)]);

        let tasks = reload(&storage);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Mine");
        // The marker is set even though nothing was seeded.
        assert!(storage.get(keys::FIRST_VISIT).unwrap().is_some());

        let mut store = TaskStore::open(&storage).unwrap();
        store.clear_all().unwrap();
        assert!(reload(&storage).is_empty());
    }

    #[test]
    fn test_corrupt_tasks_slot_loads_empty() {
        let storage = MemoryKeyValueStore::with_slots([
            (keys::TASKS, "{not json"),
            (keys::FIRST_VISIT, "true"),
        ]);

        let store = TaskStore::open(&storage).unwrap();
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_corrupt_tasks_slot_on_first_visit_is_seeded() {
        let storage = MemoryKeyValueStore::with_slots([(keys::TASKS, "{not json")]);
        let mut store = TaskStore::new(&storage);

        let ids: Vec<String> = store
            .load()
            .unwrap()
            .iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(ids, vec!["sample1", "sample2", "sample3"]);
        assert_eq!(storage.get(keys::FIRST_VISIT).unwrap().as_deref(), Some("true"));
        // The corrupt payload was replaced by the samples.
        assert_eq!(reload(&storage).len(), 3);
    }

    #[test]
    fn test_sample_texts() {
        let texts: Vec<String> = crate::service::task_store::sample_tasks(chrono::Utc::now())
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(
            texts,
            vec![
                "Welcome to TaskMaster! This is a sample task",
                "Try adding a new task with `taskmaster add`",
                "Press space in the TUI to complete a task",
            ]
        );
    }

    #[test]
    fn test_duplicate_stored_ids_keep_first() {
        let raw = r#"[
            {"id":"d","text":"first","completed":false,"priority":"low","createdAt":"2025-01-01T00:00:00Z"},
            {"id":"d","text":"second","completed":true,"priority":"high","createdAt":"2025-01-02T00:00:00Z"}
        ]"#;
        let storage = MemoryKeyValueStore::with_slots([(keys::TASKS, raw), (keys::FIRST_VISIT, "true")]);

        let tasks = reload(&storage);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "first");
    }

    #[test]
    fn test_add_appends_active_task_and_persists() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();

        let task = store.add("  Buy milk  ", Priority::High).unwrap().unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(store.tasks().len(), 1);

        let persisted = reload(&storage);
        assert_eq!(persisted, vec![task]);
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();

        assert!(store.add("", Priority::Normal).unwrap().is_none());
        assert!(store.add("   ", Priority::Normal).unwrap().is_none());
        assert!(store.tasks().is_empty());
        assert!(storage.get(keys::TASKS).unwrap().is_none());
    }

    #[test]
    fn test_added_ids_are_unique() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();

        for i in 0..20 {
            store.add(&format!("task {}", i), Priority::Normal).unwrap();
        }
        let mut ids: Vec<&TaskId> = store.tasks().iter().map(|t| &t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_edit_updates_text_and_priority_only() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();
        let task = store.add("Draft", Priority::Low).unwrap().unwrap();

        assert!(store.edit(&task.id, " Final ", Priority::High).unwrap());

        let edited = store.get(&task.id).unwrap().clone();
        assert_eq!(edited.text, "Final");
        assert_eq!(edited.priority, Priority::High);
        assert_eq!(edited.created_at, task.created_at);
        assert_eq!(reload(&storage), vec![edited]);
    }

    #[test]
    fn test_edit_rejects_blank_text_and_unknown_id() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();
        let task = store.add("Keep me", Priority::Normal).unwrap().unwrap();

        assert!(!store.edit(&task.id, "  ", Priority::High).unwrap());
        assert!(!store.edit(&TaskId::from("missing"), "New", Priority::High).unwrap());

        assert_eq!(store.tasks(), &[task.clone()]);
        assert_eq!(reload(&storage), vec![task]);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();
        let task = store.add("Flip", Priority::Normal).unwrap().unwrap();

        assert_eq!(store.toggle_completed(&task.id).unwrap(), Some(true));
        assert!(reload(&storage)[0].completed);
        assert_eq!(store.toggle_completed(&task.id).unwrap(), Some(false));
        assert!(!reload(&storage)[0].completed);

        assert_eq!(store.toggle_completed(&TaskId::from("nope")).unwrap(), None);
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_remove() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();
        let keep = store.add("Keep", Priority::Normal).unwrap().unwrap();
        let drop = store.add("Drop", Priority::Normal).unwrap().unwrap();

        let removed = store.remove(&drop.id).unwrap().unwrap();
        assert_eq!(removed.id, drop.id);
        assert!(reload(&storage).iter().all(|t| t.id != drop.id));

        assert!(store.remove(&TaskId::from("ghost")).unwrap().is_none());
        assert_eq!(store.tasks(), &[keep]);
    }

    #[test]
    fn test_clear_completed_leaves_only_active() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();
        let a = store.add("a", Priority::Normal).unwrap().unwrap();
        let b = store.add("b", Priority::Normal).unwrap().unwrap();
        store.add("c", Priority::Normal).unwrap();
        store.toggle_completed(&a.id).unwrap();
        store.toggle_completed(&b.id).unwrap();

        assert_eq!(store.clear_completed().unwrap(), 2);
        assert!(store.tasks().iter().all(|t| !t.completed));
        assert_eq!(reload(&storage).len(), 1);
        assert_eq!(store.clear_completed().unwrap(), 0);
    }

    #[test]
    fn test_set_all_completed() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();
        let a = store.add("a", Priority::Normal).unwrap().unwrap();
        store.add("b", Priority::Normal).unwrap();
        store.toggle_completed(&a.id).unwrap();

        assert_eq!(store.set_all_completed(true).unwrap(), 1);
        assert!(reload(&storage).iter().all(|t| t.completed));

        assert_eq!(store.set_all_completed(false).unwrap(), 2);
        assert!(reload(&storage).iter().all(|t| !t.completed));
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();
        store.add("a", Priority::Normal).unwrap();
        store.add("b", Priority::High).unwrap();

        assert_eq!(store.clear_all().unwrap(), 2);
        assert!(reload(&storage).is_empty());
        assert_eq!(store.clear_all().unwrap(), 0);
        assert!(reload(&storage).is_empty());
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let storage = visited();
        let mut store = TaskStore::open(&storage).unwrap();
        let task = store.add("Stable", Priority::Normal).unwrap().unwrap();

        storage.set_read_only(true);
        let err = store.toggle_completed(&task.id).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.add("Lost", Priority::High).is_err());
        assert!(store.clear_all().is_err());

        assert_eq!(store.tasks(), &[task.clone()]);
        storage.set_read_only(false);
        assert_eq!(reload(&storage), vec![task]);
    }

    #[test]
    fn test_resolve_by_prefix() {
        let raw = r#"[
            {"id":"abc123","text":"one","completed":false,"priority":"low","createdAt":"2025-01-01T00:00:00Z"},
            {"id":"abd456","text":"two","completed":false,"priority":"low","createdAt":"2025-01-01T00:00:00Z"},
            {"id":"ab","text":"three","completed":false,"priority":"low","createdAt":"2025-01-01T00:00:00Z"}
        ]"#;
        let storage = MemoryKeyValueStore::with_slots([(keys::TASKS, raw), (keys::FIRST_VISIT, "true")]);
        let store = TaskStore::open(&storage).unwrap();

        assert_eq!(store.resolve("abc"), Some(TaskId::from("abc123")));
        assert_eq!(store.resolve("ab"), Some(TaskId::from("ab")));
        assert_eq!(store.resolve("a"), None);
        assert_eq!(store.resolve("zzz"), None);
        assert_eq!(store.resolve(" "), None);
    }

    #[test]
    fn test_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileKeyValueStore::open(&StoreConfig::new(dir.path().to_path_buf())).unwrap();
        let mut store = TaskStore::open(storage.clone()).unwrap();
        assert_eq!(store.tasks().len(), 3);

        let added = store.add("From disk", Priority::High).unwrap().unwrap();
        store.toggle_completed(&TaskId::from("sample1")).unwrap();

        let reopened = TaskStore::open(storage).unwrap();
        assert_eq!(reopened.tasks().len(), 4);
        assert_eq!(reopened.get(&added.id), Some(&added));
        assert!(reopened.get(&TaskId::from("sample1")).unwrap().completed);
    }
}
