//! The persisted application state and every action that mutates it.
//!
//! `AppStore` owns bookmarks, settings, todos and the pomodoro timer. Every
//! mutating action writes the whole state through to one storage slot before
//! returning. Storage trouble never stops the page: a failed read or an
//! undecodable slot starts from defaults, and a failed write drops to
//! memory-only mode for the session. A slot that cannot be decoded is never
//! overwritten.

mod config;

pub use config::{EXPORT_VERSION, ExportConfig, ImportDocument, ImportError};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use crate::bookmarks::{Bookmark, BookmarkPatch, NewBookmark, default_bookmarks};
use crate::gesture::LayoutSink;
use crate::pomodoro::{PomodoroDurations, PomodoroMode, PomodoroState, TickOutcome, TickSchedule};
use crate::position::{AnchorPreset, ComponentPosition};
use crate::settings::{AppSettings, BackgroundConfig, BookmarkDisplayMode, SearchEngine};
use crate::storage::SlotStorage;
use crate::todos::Todo;
use crate::widgets::{ResizeAxis, WidgetKind};

/// Key of the storage slot.
pub const STORAGE_KEY: &str = "new-tab-storage";

/// Everything that survives a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub bookmarks: Vec<Bookmark>,
    pub settings: AppSettings,
    pub todos: Vec<Todo>,
    pub pomodoro: PomodoroState,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            bookmarks: default_bookmarks(),
            settings: AppSettings::default(),
            todos: Vec::new(),
            pomodoro: PomodoroState::default(),
        }
    }
}

/// Slot layout shared with the web build: `{"state": {...}, "version": 0}`.
#[derive(Serialize)]
struct SlotEnvelope<'a> {
    state: &'a PersistedState,
    version: u32,
}

fn encode_slot(state: &PersistedState) -> serde_json::Result<String> {
    serde_json::to_string(&SlotEnvelope { state, version: 0 })
}

/// Accepts the envelope or a bare state object.
fn decode_slot(json: &str) -> serde_json::Result<PersistedState> {
    let value: Value = serde_json::from_str(json)?;
    let state = match value {
        Value::Object(mut root) if root.contains_key("state") => {
            root.remove("state").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(state)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Owner of the persisted state.
pub struct AppStore<S: SlotStorage> {
    state: PersistedState,
    storage: S,
    /// False once storage has failed; nothing is written after that.
    persistent: bool,
}

impl<S: SlotStorage> AppStore<S> {
    /// Seed the store from the slot in `storage`.
    pub fn load(storage: S) -> Self {
        let mut persistent = true;
        let mut state = match storage.read(STORAGE_KEY) {
            Ok(Some(json)) => match decode_slot(&json) {
                Ok(state) => {
                    log::info!("Loaded saved state");
                    state
                }
                Err(e) => {
                    log::warn!(
                        "Saved state is unreadable, using defaults without saving: {}",
                        e
                    );
                    persistent = false;
                    PersistedState::default()
                }
            },
            Ok(None) => {
                log::info!("No saved state, starting from defaults");
                PersistedState::default()
            }
            Err(e) => {
                log::warn!("Storage unavailable, changes will not be saved: {}", e);
                persistent = false;
                PersistedState::default()
            }
        };
        if state.settings.clamp_sizes() {
            log::debug!("Clamped out-of-range widget sizes from saved state");
        }
        Self {
            state,
            storage,
            persistent,
        }
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.state.bookmarks
    }

    pub fn settings(&self) -> &AppSettings {
        &self.state.settings
    }

    pub fn todos(&self) -> &[Todo] {
        &self.state.todos
    }

    pub fn pomodoro(&self) -> &PomodoroState {
        &self.state.pomodoro
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// False when running memory-only.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Write the state through to storage.
    fn commit(&mut self) {
        if !self.persistent {
            return;
        }
        let json = match encode_slot(&self.state) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize state: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.write(STORAGE_KEY, &json) {
            log::warn!("Failed to save state, continuing in memory only: {}", e);
            self.persistent = false;
        }
    }

    /// Replace all four entity families with their defaults.
    pub fn reset_to_default(&mut self) {
        self.state = PersistedState::default();
        log::info!("State reset to defaults");
        self.commit();
    }

    // Bookmarks

    /// Add a bookmark and return its new id.
    pub fn add_bookmark(&mut self, bookmark: NewBookmark) -> String {
        let id = new_id();
        self.state.bookmarks.push(bookmark.with_id(id.clone()));
        self.commit();
        id
    }

    pub fn remove_bookmark(&mut self, id: &str) -> bool {
        let before = self.state.bookmarks.len();
        self.state.bookmarks.retain(|bookmark| bookmark.id != id);
        let removed = self.state.bookmarks.len() != before;
        if removed {
            self.commit();
        }
        removed
    }

    pub fn update_bookmark(&mut self, id: &str, patch: BookmarkPatch) -> bool {
        let Some(bookmark) = self.state.bookmarks.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        patch.apply(bookmark);
        self.commit();
        true
    }

    /// Replace the bookmark list with a reordered one.
    pub fn reorder_bookmarks(&mut self, bookmarks: Vec<Bookmark>) {
        self.state.bookmarks = bookmarks;
        self.commit();
    }

    // Settings

    /// Edit settings in place. Sizes are clamped afterwards.
    pub fn update_settings(&mut self, update: impl FnOnce(&mut AppSettings)) {
        update(&mut self.state.settings);
        self.state.settings.clamp_sizes();
        self.commit();
    }

    pub fn set_search_engine(&mut self, engine: SearchEngine) {
        self.update_settings(|settings| settings.search_engine = engine);
    }

    pub fn set_background(&mut self, background: BackgroundConfig) {
        self.update_settings(|settings| settings.background = background);
    }

    pub fn set_custom_css(&mut self, css: impl Into<String>) {
        let css = css.into();
        self.update_settings(|settings| settings.custom_css = css);
    }

    pub fn set_show_seconds(&mut self, show: bool) {
        self.update_settings(|settings| settings.show_seconds = show);
    }

    pub fn set_bookmark_display_mode(&mut self, mode: BookmarkDisplayMode) {
        self.update_settings(|settings| settings.bookmark_display_mode = mode);
    }

    pub fn set_widget_position(&mut self, widget: WidgetKind, position: ComponentPosition) {
        *self.state.settings.position_mut(widget) = position;
        self.commit();
    }

    /// Store a clamped size. `None` if the widget has no such handle.
    pub fn set_widget_size(
        &mut self,
        widget: WidgetKind,
        axis: ResizeAxis,
        value: u32,
    ) -> Option<u32> {
        let stored = self.state.settings.set_size(widget, axis, value)?;
        self.commit();
        Some(stored)
    }

    /// Flip a widget's visibility. False for widgets that are always shown.
    pub fn toggle_widget(&mut self, widget: WidgetKind) -> bool {
        let toggled = self.state.settings.toggle_widget(widget);
        if toggled {
            self.commit();
        }
        toggled
    }

    /// Move a widget to another anchor. A different anchor resets the offset.
    pub fn change_widget_anchor(&mut self, widget: WidgetKind, preset: AnchorPreset) {
        self.state.settings.change_anchor(widget, preset);
        self.commit();
    }

    // Todos

    pub fn add_todo(&mut self, text: impl Into<String>) -> String {
        let id = new_id();
        self.state
            .todos
            .push(Todo::new(id.clone(), text, chrono::Utc::now()));
        self.commit();
        id
    }

    pub fn toggle_todo(&mut self, id: &str) -> bool {
        let Some(todo) = self.state.todos.iter_mut().find(|todo| todo.id == id) else {
            return false;
        };
        todo.completed = !todo.completed;
        self.commit();
        true
    }

    pub fn remove_todo(&mut self, id: &str) -> bool {
        let before = self.state.todos.len();
        self.state.todos.retain(|todo| todo.id != id);
        let removed = self.state.todos.len() != before;
        if removed {
            self.commit();
        }
        removed
    }

    /// Drop completed todos. Returns how many were removed.
    pub fn clear_completed_todos(&mut self) -> usize {
        let before = self.state.todos.len();
        self.state.todos.retain(|todo| !todo.completed);
        let removed = before - self.state.todos.len();
        if removed > 0 {
            self.commit();
        }
        removed
    }

    // Pomodoro

    pub fn start_pomodoro(&mut self) {
        if self.state.pomodoro.start() {
            self.commit();
        }
    }

    pub fn pause_pomodoro(&mut self) {
        self.state.pomodoro.pause();
        self.commit();
    }

    pub fn reset_pomodoro(&mut self) {
        self.state.pomodoro.reset();
        self.commit();
    }

    pub fn tick_pomodoro(&mut self) -> TickOutcome {
        let outcome = self.state.pomodoro.tick();
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Counted => self.commit(),
            TickOutcome::Transitioned { from, to } => {
                log::info!(
                    "Pomodoro {:?} finished, next {:?} (sessions: {})",
                    from,
                    to,
                    self.state.pomodoro.sessions_completed
                );
                self.commit();
            }
        }
        outcome
    }

    pub fn set_pomodoro_durations(&mut self, durations: PomodoroDurations) {
        self.state.pomodoro.set_durations(durations);
        self.commit();
    }

    /// Apply every tick `schedule` has due by `now`, then re-sync the schedule
    /// with the timer. Returns the phase change, if one happened.
    pub fn run_due_ticks(
        &mut self,
        schedule: &mut TickSchedule,
        now: Instant,
    ) -> Option<(PomodoroMode, PomodoroMode)> {
        let mut transition = None;
        for _ in 0..schedule.due(now) {
            match self.tick_pomodoro() {
                TickOutcome::Counted => {}
                TickOutcome::Idle => break,
                TickOutcome::Transitioned { from, to } => {
                    transition = Some((from, to));
                    break;
                }
            }
        }
        schedule.sync(self.state.pomodoro.is_running, now);
        transition
    }
}

impl<S: SlotStorage> LayoutSink for AppStore<S> {
    fn widget_position(&self, widget: WidgetKind) -> ComponentPosition {
        *self.state.settings.position(widget)
    }

    fn widget_size(&self, widget: WidgetKind, axis: ResizeAxis) -> Option<u32> {
        self.state.settings.size(widget, axis)
    }

    fn set_widget_position(&mut self, widget: WidgetKind, position: ComponentPosition) {
        AppStore::set_widget_position(self, widget, position);
    }

    fn set_widget_size(&mut self, widget: WidgetKind, axis: ResizeAxis, value: u32) {
        AppStore::set_widget_size(self, widget, axis, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{HandleTarget, LayoutSession};
    use crate::storage::{MemoryStorage, StorageError, StorageResult};
    use kurbo::Point;
    use std::cell::Cell;
    use std::time::Duration;

    /// Storage whose reads and/or writes fail, counting attempts.
    #[derive(Default)]
    struct FailingStorage {
        fail_reads: bool,
        fail_writes: bool,
        write_attempts: Cell<usize>,
    }

    impl SlotStorage for FailingStorage {
        fn read(&self, _key: &str) -> StorageResult<Option<String>> {
            if self.fail_reads {
                Err(StorageError::Unavailable("denied".to_string()))
            } else {
                Ok(None)
            }
        }

        fn write(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            self.write_attempts.set(self.write_attempts.get() + 1);
            if self.fail_writes {
                Err(StorageError::Io("quota exceeded".to_string()))
            } else {
                Ok(())
            }
        }

        fn remove(&mut self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    fn saved(store: &AppStore<MemoryStorage>) -> PersistedState {
        decode_slot(store.storage().get(STORAGE_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_missing_slot_seeds_defaults() {
        let store = AppStore::load(MemoryStorage::new());
        assert_eq!(store.bookmarks().len(), 8);
        assert!(store.todos().is_empty());
        assert_eq!(store.pomodoro(), &PomodoroState::default());
        assert!(store.is_persistent());
        assert_eq!(store.storage().write_count(), 0);
    }

    #[test]
    fn test_loads_envelope_with_missing_fields() {
        let storage = MemoryStorage::with_slot(
            STORAGE_KEY,
            r#"{"state":{"settings":{"showSeconds":true,"weatherSize":9999},"todos":[]},"version":0}"#,
        );
        let store = AppStore::load(storage);
        assert!(store.settings().show_seconds);
        assert_eq!(store.settings().weather_size, 400);
        assert_eq!(store.settings().weather_city, "北京");
        assert_eq!(store.bookmarks().len(), 8);
    }

    #[test]
    fn test_loads_bare_state() {
        let storage = MemoryStorage::with_slot(STORAGE_KEY, r#"{"bookmarks":[]}"#);
        let store = AppStore::load(storage);
        assert!(store.bookmarks().is_empty());
    }

    #[test]
    fn test_corrupt_slot_uses_defaults() {
        let storage = MemoryStorage::with_slot(STORAGE_KEY, "{\"state\": [1, 2");
        let mut store = AppStore::load(storage);
        assert_eq!(store.state(), &PersistedState::default());
        assert!(!store.is_persistent());

        store.set_show_seconds(true);
        assert!(store.settings().show_seconds);
        assert_eq!(store.storage().write_count(), 0);
        assert_eq!(
            store.storage().get(STORAGE_KEY),
            Some("{\"state\": [1, 2")
        );
    }

    #[test]
    fn test_undecodable_field_keeps_saved_data() {
        let slot = r#"{"state":{
            "bookmarks":[{"id":"mine","icon":"M","title":"Mine","url":"https://mine.example"}],
            "todos":[{"id":"t","text":"x","completed":false,"createdAt":"yesterday"}]
        },"version":0}"#;
        let mut store = AppStore::load(MemoryStorage::with_slot(STORAGE_KEY, slot));
        assert!(!store.is_persistent());

        store.set_show_seconds(true);
        store.add_todo("after load");
        assert_eq!(store.storage().get(STORAGE_KEY), Some(slot));
        assert!(store.storage().get(STORAGE_KEY).unwrap().contains("\"mine\""));
    }

    #[test]
    fn test_every_action_writes_through() {
        let mut store = AppStore::load(MemoryStorage::new());

        let id = store.add_todo("buy milk");
        assert_eq!(store.storage().write_count(), 1);
        assert_eq!(saved(&store).todos[0].text, "buy milk");

        store.toggle_todo(&id);
        assert!(saved(&store).todos[0].completed);

        store.toggle_widget(WidgetKind::Note);
        assert!(saved(&store).settings.show_note);

        store.set_search_engine(SearchEngine::DuckDuckGo);
        assert_eq!(saved(&store).settings.search_engine, SearchEngine::DuckDuckGo);
        assert_eq!(store.storage().write_count(), 4);

        let envelope: Value =
            serde_json::from_str(store.storage().get(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(envelope["version"], 0);
        assert!(envelope["state"]["pomodoro"].is_object());
    }

    #[test]
    fn test_noop_actions_do_not_write() {
        let mut store = AppStore::load(MemoryStorage::new());
        assert!(!store.remove_todo("missing"));
        assert!(!store.toggle_todo("missing"));
        assert!(!store.remove_bookmark("missing"));
        assert!(!store.update_bookmark("missing", BookmarkPatch::default()));
        assert!(!store.toggle_widget(WidgetKind::Clock));
        assert_eq!(store.clear_completed_todos(), 0);
        assert_eq!(store.set_widget_size(WidgetKind::Search, ResizeAxis::Uniform, 10), None);
        assert_eq!(store.storage().write_count(), 0);
    }

    #[test]
    fn test_bookmark_actions() {
        let mut store = AppStore::load(MemoryStorage::new());
        let id = store.add_bookmark(NewBookmark::new("🦀", "Rust", "https://www.rust-lang.org"));
        assert_eq!(store.bookmarks().len(), 9);

        assert!(store.update_bookmark(
            &id,
            BookmarkPatch {
                title: Some("Rust Lang".to_string()),
                ..BookmarkPatch::default()
            }
        ));
        let added = store.bookmarks().iter().find(|b| b.id == id).unwrap();
        assert_eq!(added.title, "Rust Lang");
        assert_eq!(added.icon, "🦀");

        let mut reordered = store.bookmarks().to_vec();
        reordered.reverse();
        store.reorder_bookmarks(reordered);
        assert_eq!(store.bookmarks()[0].id, id);

        assert!(store.remove_bookmark(&id));
        assert_eq!(saved(&store).bookmarks.len(), 8);
    }

    #[test]
    fn test_todo_actions() {
        let mut store = AppStore::load(MemoryStorage::new());
        let a = store.add_todo("one");
        let b = store.add_todo("two");
        store.add_todo("three");
        assert_ne!(a, b);

        store.toggle_todo(&a);
        store.toggle_todo(&b);
        assert_eq!(store.clear_completed_todos(), 2);
        assert_eq!(store.todos().len(), 1);
        assert_eq!(store.todos()[0].text, "three");
    }

    #[test]
    fn test_change_anchor_resets_offset() {
        let mut store = AppStore::load(MemoryStorage::new());
        store.set_widget_position(
            WidgetKind::Weather,
            ComponentPosition::new(AnchorPreset::CenterLeft, 40, 12),
        );
        store.change_widget_anchor(WidgetKind::Weather, AnchorPreset::CenterRight);
        assert_eq!(
            saved(&store).settings.weather_position,
            ComponentPosition::new(AnchorPreset::CenterRight, 0, 0)
        );
    }

    #[test]
    fn test_update_settings_clamps_sizes() {
        let mut store = AppStore::load(MemoryStorage::new());
        store.update_settings(|settings| {
            settings.todo_height = 5;
            settings.note_content = "hello".to_string();
        });
        assert_eq!(store.settings().todo_height, 200);
        assert_eq!(saved(&store).settings.note_content, "hello");
    }

    #[test]
    fn test_reset_to_default() {
        let mut store = AppStore::load(MemoryStorage::new());
        store.add_todo("x");
        store.set_custom_css("body { color: red }");
        store.start_pomodoro();
        store.reset_to_default();
        assert_eq!(store.state(), &PersistedState::default());
        assert_eq!(saved(&store), PersistedState::default());
    }

    #[test]
    fn test_read_failure_runs_in_memory() {
        let storage = FailingStorage {
            fail_reads: true,
            ..FailingStorage::default()
        };
        let mut store = AppStore::load(storage);
        assert!(!store.is_persistent());
        store.add_todo("kept in memory");
        assert_eq!(store.todos().len(), 1);
        assert_eq!(store.storage().write_attempts.get(), 0);
    }

    #[test]
    fn test_write_failure_stops_writing() {
        let storage = FailingStorage {
            fail_writes: true,
            ..FailingStorage::default()
        };
        let mut store = AppStore::load(storage);
        store.set_show_seconds(true);
        store.set_show_seconds(false);
        store.add_todo("still works");
        assert!(!store.is_persistent());
        assert_eq!(store.storage().write_attempts.get(), 1);
        assert_eq!(store.todos().len(), 1);
        assert!(!store.settings().show_seconds);
    }

    #[test]
    fn test_pomodoro_actions_persist() {
        let mut store = AppStore::load(MemoryStorage::new());
        store.start_pomodoro();
        assert_eq!(store.tick_pomodoro(), TickOutcome::Counted);
        store.pause_pomodoro();
        assert_eq!(store.tick_pomodoro(), TickOutcome::Idle);
        let pomodoro = saved(&store).pomodoro;
        assert!(!pomodoro.is_running);
        assert_eq!(pomodoro.time_left, 1499);

        store.set_pomodoro_durations(PomodoroDurations {
            work: Some(30),
            ..Default::default()
        });
        assert_eq!(store.pomodoro().time_left, 1800);
        store.reset_pomodoro();
        assert_eq!(saved(&store).pomodoro.time_left, 1800);
    }

    #[test]
    fn test_due_ticks_stop_at_boundary() {
        let mut store = AppStore::load(MemoryStorage::new());
        store.set_pomodoro_durations(PomodoroDurations {
            work: Some(1),
            ..Default::default()
        });
        let start = Instant::now();
        let mut schedule = TickSchedule::default();
        store.start_pomodoro();
        schedule.sync(store.pomodoro().is_running, start);

        assert_eq!(store.run_due_ticks(&mut schedule, start + Duration::from_secs(30)), None);
        assert_eq!(store.pomodoro().time_left, 30);

        let transition = store.run_due_ticks(&mut schedule, start + Duration::from_secs(90));
        assert_eq!(transition, Some((PomodoroMode::Work, PomodoroMode::Break)));
        assert_eq!(store.pomodoro().sessions_completed, 1);
        assert!(!schedule.is_armed());
        assert_eq!(store.pomodoro().time_left, 300);
    }

    #[test]
    fn test_gesture_writes_through_store() {
        let mut store = AppStore::load(MemoryStorage::new());
        let mut session = LayoutSession::new();
        session.set_edit_mode(true);

        session
            .pointer_down(
                HandleTarget::Resize(WidgetKind::Pomodoro, ResizeAxis::Uniform),
                Point::new(0.0, 0.0),
                &store,
            )
            .unwrap();
        session.pointer_move(Point::new(0.0, 40.0), &mut store).unwrap();
        session.pointer_up();

        assert_eq!(saved(&store).settings.pomodoro_size, 220);
        assert_eq!(session.hub().listener_count(), 0);
    }
}
