use ratatui::widgets::TableState;
use taskmaster_core::{
    parse_task_line, KeyValueStore, PreferenceService, Projection, Task, TaskId, TaskStats,
    TaskStore, Theme, ViewFilter,
};

pub enum InputMode {
    Normal,
    Adding,
    Editing(TaskId),
    Searching,
    ConfirmClearAll,
}

pub struct App<S: KeyValueStore> {
    pub store: TaskStore<S>,
    pub prefs: PreferenceService<S>,
    pub filter: ViewFilter,
    pub projection: Projection,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub theme: Theme,
    pub message: Option<String>,
}

impl<S: KeyValueStore + Clone> App<S> {
    pub fn new(storage: S) -> anyhow::Result<Self> {
        let store = TaskStore::open(storage.clone())?;
        let prefs = PreferenceService::new(storage);
        let theme = prefs.theme()?;
        let filter = ViewFilter::default();
        let projection = store.project(&filter);

        let mut state = TableState::default();
        if !projection.is_empty() {
            state.select(Some(0));
        }
        Ok(App {
            store,
            prefs,
            filter,
            projection,
            state,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            theme,
            message: None,
        })
    }
}

impl<S: KeyValueStore> App<S> {
    pub fn visible(&self) -> &[Task] {
        &self.projection.tasks
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.visible().get(i))
    }

    pub fn stats(&self) -> TaskStats {
        self.store.stats()
    }

    pub fn next(&mut self) {
        if self.visible().is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.visible().len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.visible().is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.visible().len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Recomputes the projection and keeps the selection on the same task
    /// when it is still visible.
    fn refresh(&mut self) {
        let selected_id = self.selected_task().map(|t| t.id.clone());
        let previous_index = self.state.selected();
        self.projection = self.store.project(&self.filter);

        let len = self.visible().len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let index = selected_id
            .and_then(|id| self.visible().iter().position(|t| t.id == id))
            .or(previous_index)
            .unwrap_or(0)
            .min(len - 1);
        self.state.select(Some(index));
    }

    fn select_id(&mut self, id: &TaskId) {
        if let Some(pos) = self.visible().iter().position(|t| &t.id == id) {
            self.state.select(Some(pos));
        }
    }

    fn report<T>(&mut self, result: taskmaster_core::error::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.message = Some(format!("Save failed: {}", e));
                None
            }
        }
    }

    pub fn toggle_status(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else { return };
        let result = self.store.toggle_completed(&id);
        self.report(result);
        self.refresh();
    }

    pub fn delete_task(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else { return };
        let result = self.store.remove(&id);
        if let Some(Some(task)) = self.report(result) {
            self.message = Some(format!("Deleted: {}", task.text));
        }
        self.refresh();
    }

    pub fn clear_completed(&mut self) {
        let result = self.store.clear_completed();
        if let Some(removed) = self.report(result) {
            self.message = Some(format!("Removed {} completed task(s)", removed));
        }
        self.refresh();
    }

    pub fn set_all_completed(&mut self, value: bool) {
        let result = self.store.set_all_completed(value);
        self.report(result);
        self.refresh();
    }

    pub fn cycle_status_filter(&mut self) {
        self.filter.status = self.filter.status.next();
        self.refresh();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.filter.priority = self.filter.priority.next();
        self.refresh();
    }

    pub fn toggle_theme(&mut self) {
        let result = self.prefs.toggle_theme();
        if let Some(theme) = self.report(result) {
            self.theme = theme;
        }
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.set_input(String::new());
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(task) = self.selected_task() else { return };
        let id = task.id.clone();
        let prefill = format!("{} pri:{}", task.text, task.priority);
        self.input_mode = InputMode::Editing(id);
        self.set_input(prefill);
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
        let current = self.filter.search.clone();
        self.set_input(current);
    }

    pub fn enter_confirm_clear_all(&mut self) {
        if !self.store.tasks().is_empty() {
            self.input_mode = InputMode::ConfirmClearAll;
        }
    }

    pub fn confirm_clear_all(&mut self, confirmed: bool) {
        if confirmed {
            let result = self.store.clear_all();
            if let Some(removed) = self.report(result) {
                self.message = Some(format!("Deleted {} task(s)", removed));
            }
            self.refresh();
        }
        self.input_mode = InputMode::Normal;
    }

    /// Leaves input mode. Cancelling a search also clears it.
    pub fn exit_input_mode(&mut self) {
        if matches!(self.input_mode, InputMode::Searching) {
            self.filter.search.clear();
            self.refresh();
        }
        self.input_mode = InputMode::Normal;
    }

    fn set_input(&mut self, value: String) {
        self.cursor_position = value.chars().count();
        self.input = value;
    }

    fn input_changed(&mut self) {
        if matches!(self.input_mode, InputMode::Searching) {
            self.filter.search = self.input.clone();
            self.refresh();
        }
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
        self.input_changed();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
            self.input_changed();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_command(&mut self) {
        let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);
        match mode {
            InputMode::Adding => self.submit_add(),
            InputMode::Editing(id) => self.submit_edit(&id),
            InputMode::Searching | InputMode::Normal | InputMode::ConfirmClearAll => {}
        }
        self.input.clear();
        self.cursor_position = 0;
    }

    fn submit_add(&mut self) {
        let parsed = match parse_task_line(&self.input) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.message = Some(e.to_string());
                return;
            }
        };

        let result = self.store.add(&parsed.text, parsed.priority.unwrap_or_default());
        match self.report(result) {
            Some(Some(task)) => {
                self.refresh();
                self.select_id(&task.id);
            }
            Some(None) => self.message = Some("Task text is required".to_string()),
            None => {}
        }
    }

    // Blank text cancels the edit, same as Esc.
    fn submit_edit(&mut self, id: &TaskId) {
        let parsed = match parse_task_line(&self.input) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.message = Some(e.to_string());
                return;
            }
        };
        let Some(current) = self.store.get(id).map(|t| t.priority) else { return };

        let result = self.store.edit(id, &parsed.text, parsed.priority.unwrap_or(current));
        if let Some(false) = self.report(result) {
            self.message = Some("Edit cancelled".to_string());
        }
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmaster_core::repository::keys;
    use taskmaster_core::{MemoryKeyValueStore, Priority, StatusFilter};

    fn app_with(storage: &MemoryKeyValueStore) -> App<&MemoryKeyValueStore> {
        App::new(storage).unwrap()
    }

    fn type_text(app: &mut App<&MemoryKeyValueStore>, text: &str) {
        for c in text.chars() {
            app.input_char(c);
        }
    }

    #[test]
    fn test_first_run_shows_samples_sorted() {
        let storage = MemoryKeyValueStore::new();
        let app = app_with(&storage);

        let ids: Vec<&str> = app.visible().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["sample2", "sample1", "sample3"]);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_add_through_input_selects_new_task() {
        let storage = MemoryKeyValueStore::with_slots([(keys::FIRST_VISIT, "true")]);
        let mut app = app_with(&storage);

        app.enter_add_mode();
        type_text(&mut app, "Buy milk pri:h");
        app.submit_command();

        let task = app.selected_task().unwrap();
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.priority, Priority::High);
        assert!(matches!(app.input_mode, InputMode::Normal));
    }

    #[test]
    fn test_blank_edit_keeps_task() {
        let storage = MemoryKeyValueStore::with_slots([(keys::FIRST_VISIT, "true")]);
        let mut app = app_with(&storage);
        app.enter_add_mode();
        type_text(&mut app, "Original");
        app.submit_command();

        app.enter_edit_mode();
        while !app.input.is_empty() {
            app.delete_char();
        }
        app.submit_command();

        assert_eq!(app.selected_task().unwrap().text, "Original");
        assert_eq!(app.message.as_deref(), Some("Edit cancelled"));
    }

    #[test]
    fn test_add_keeps_colon_words_and_spacing() {
        let storage = MemoryKeyValueStore::with_slots([(keys::FIRST_VISIT, "true")]);
        let mut app = app_with(&storage);

        app.enter_add_mode();
        type_text(&mut app, "Review PR:  login flow");
        app.submit_command();

        let task = app.selected_task().unwrap();
        assert_eq!(task.text, "Review PR:  login flow");
        assert_eq!(task.priority, Priority::Normal);
        assert_eq!(app.message, None);
    }

    #[test]
    fn test_search_filters_live_and_escape_clears() {
        let storage = MemoryKeyValueStore::new();
        let mut app = app_with(&storage);

        app.enter_search_mode();
        type_text(&mut app, "welcome");
        assert_eq!(app.visible().len(), 1);

        app.exit_input_mode();
        assert_eq!(app.visible().len(), 3);
    }

    #[test]
    fn test_filters_and_toggle_keep_projection_current() {
        let storage = MemoryKeyValueStore::new();
        let mut app = app_with(&storage);

        app.cycle_status_filter();
        assert_eq!(app.filter.status, StatusFilter::Active);
        assert_eq!(app.visible().len(), 2);

        app.toggle_status();
        assert_eq!(app.visible().len(), 1);
        assert_eq!(app.stats().completed, 2);
    }

    #[test]
    fn test_clear_all_requires_confirmation() {
        let storage = MemoryKeyValueStore::new();
        let mut app = app_with(&storage);

        app.enter_confirm_clear_all();
        app.confirm_clear_all(false);
        assert_eq!(app.stats().total, 3);

        app.enter_confirm_clear_all();
        app.confirm_clear_all(true);
        assert_eq!(app.stats().total, 0);
        assert_eq!(app.state.selected(), None);
    }
}
