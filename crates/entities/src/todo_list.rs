//! TodoList entity definitions.

use serde::{Deserialize, Serialize};

use crate::Todo;

/// A titled collection of todos owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Backend-assigned identifier.
    pub id: i64,
    /// List title, unique per owner.
    pub title: String,
    /// Todos in insertion order.
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Creates a new, empty todo list.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            todos: Vec::new(),
        }
    }

    /// Sets the todos of the list.
    pub fn with_todos(mut self, todos: Vec<Todo>) -> Self {
        self.todos = todos;
        self
    }

    /// A list is done when it has at least one todo and every todo is done.
    /// An empty list is never done.
    pub fn is_done(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|todo| todo.done)
    }

    /// Returns true if any todo in the list is not done.
    pub fn has_undone_todos(&self) -> bool {
        self.todos.iter().any(|todo| !todo.done)
    }

    /// Finds a todo by ID.
    pub fn find_todo(&self, todo_id: i64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    /// Finds a todo by ID for mutation.
    pub fn find_todo_mut(&mut self, todo_id: i64) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == todo_id)
    }
}
