//! Todo entity definitions.

use serde::{Deserialize, Serialize};

/// A single item in a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Todo title.
    pub title: String,
    /// Whether the todo has been completed.
    pub done: bool,
}

impl Todo {
    /// Creates a new, not-done todo.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }

    /// Sets the done flag.
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Flips the done flag.
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }
}
