//! Todo list entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// A fresh, uncompleted todo.
    pub fn new(id: String, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at,
        }
    }
}

/// Counts shown in the todo widget header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoSummary {
    pub total: usize,
    pub completed: usize,
}

impl TodoSummary {
    pub fn of(todos: &[Todo]) -> Self {
        Self {
            total: todos.len(),
            completed: todos.iter().filter(|todo| todo.completed).count(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.total - self.completed
    }
}
