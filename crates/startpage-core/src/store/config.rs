//! Configuration export and import.
//!
//! An import is parsed and merged completely before the store is touched, so
//! a rejected document leaves every entity family as it was.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{AppStore, PersistedState};
use crate::bookmarks::Bookmark;
use crate::settings::AppSettings;
use crate::storage::SlotStorage;
use crate::todos::Todo;

/// Format version written into exports.
pub const EXPORT_VERSION: &str = "2.0";

/// A full configuration export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    pub version: String,
    pub bookmarks: Vec<Bookmark>,
    pub settings: AppSettings,
    pub todos: Vec<Todo>,
    pub exported_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Unexpected document shape: {0}")]
    WrongShape(String),
}

/// A parsed import document. Each present part replaces (lists) or is merged
/// over (settings) the current state; absent parts are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportDocument {
    pub bookmarks: Option<Vec<Bookmark>>,
    /// Raw settings object, merged key by key.
    pub settings: Option<Map<String, Value>>,
    pub todos: Option<Vec<Todo>>,
}

impl ImportDocument {
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Accepts a full export or any object with at least one of `bookmarks`,
    /// `settings`, `todos`. Other keys (`version`, `exportedAt`, ...) are
    /// ignored, and `null` counts as absent.
    pub fn from_value(value: Value) -> Result<Self, ImportError> {
        let Value::Object(mut root) = value else {
            return Err(ImportError::WrongShape("expected a JSON object".to_string()));
        };
        let settings = match root.remove("settings") {
            None | Some(Value::Null) => None,
            Some(Value::Object(settings)) => Some(settings),
            Some(_) => {
                return Err(ImportError::WrongShape(
                    "settings must be an object".to_string(),
                ));
            }
        };
        let document = Self {
            bookmarks: take_list(&mut root, "bookmarks")?,
            settings,
            todos: take_list(&mut root, "todos")?,
        };
        if document.is_empty() {
            return Err(ImportError::WrongShape(
                "no bookmarks, settings or todos".to_string(),
            ));
        }
        Ok(document)
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_none() && self.settings.is_none() && self.todos.is_none()
    }

    /// The state this document would produce over `current`.
    pub fn merge_over(&self, current: &PersistedState) -> Result<PersistedState, ImportError> {
        let settings = match &self.settings {
            Some(overlay) => merge_settings(&current.settings, overlay)?,
            None => current.settings.clone(),
        };
        Ok(PersistedState {
            bookmarks: self
                .bookmarks
                .clone()
                .unwrap_or_else(|| current.bookmarks.clone()),
            settings,
            todos: self.todos.clone().unwrap_or_else(|| current.todos.clone()),
            pomodoro: current.pomodoro.clone(),
        })
    }
}

fn take_list<T: DeserializeOwned>(
    root: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<T>>, ImportError> {
    match root.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ImportError::WrongShape(format!("{}: {}", key, e))),
    }
}

/// Shallow merge: top-level keys of `overlay` replace the current values,
/// every other field keeps its current value.
fn merge_settings(
    current: &AppSettings,
    overlay: &Map<String, Value>,
) -> Result<AppSettings, ImportError> {
    let Value::Object(mut merged) = serde_json::to_value(current)? else {
        return Err(ImportError::WrongShape(
            "settings did not serialize to an object".to_string(),
        ));
    };
    for (key, value) in overlay {
        if !value.is_null() {
            merged.insert(key.clone(), value.clone());
        }
    }
    let mut settings: AppSettings = serde_json::from_value(Value::Object(merged))
        .map_err(|e| ImportError::WrongShape(format!("settings: {}", e)))?;
    settings.clamp_sizes();
    Ok(settings)
}

impl<S: SlotStorage> AppStore<S> {
    /// Snapshot of the current state in export form.
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            version: EXPORT_VERSION.to_string(),
            bookmarks: self.state.bookmarks.clone(),
            settings: self.state.settings.clone(),
            todos: self.state.todos.clone(),
            exported_at: Utc::now(),
        }
    }

    /// Pretty-printed export JSON.
    pub fn export(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.export_config())
    }

    /// Import a configuration. Returns false, without changing anything, if
    /// the document is rejected.
    pub fn import(&mut self, json: &str) -> bool {
        match self.import_config(json) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Import rejected: {}", e);
                false
            }
        }
    }

    /// Import a configuration, reporting why it was rejected.
    pub fn import_config(&mut self, json: &str) -> Result<(), ImportError> {
        let document = ImportDocument::parse(json)?;
        self.import_document(&document)
    }

    /// Apply an already parsed document.
    pub fn import_document(&mut self, document: &ImportDocument) -> Result<(), ImportError> {
        let next = document.merge_over(&self.state)?;
        log::info!(
            "Imported configuration (bookmarks: {}, settings: {}, todos: {})",
            document.bookmarks.is_some(),
            document.settings.is_some(),
            document.todos.is_some()
        );
        self.state = next;
        self.commit();
        Ok(())
    }
}
