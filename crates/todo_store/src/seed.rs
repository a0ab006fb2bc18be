//! Seed fixtures for the session backend.

use std::path::Path;

use entities::{Todo, TodoList};
use serde::{Deserialize, Serialize};

use crate::{IdGenerator, StoreResult};

const BUILTIN_SEED: &str = include_str!("../fixtures/seed.json");

/// A todo in a seed fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTodo {
    /// Todo title.
    pub title: String,
    /// Whether the todo starts out done.
    #[serde(default)]
    pub done: bool,
}

/// A todo list in a seed fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedList {
    /// List title.
    pub title: String,
    /// Todos of the list.
    #[serde(default)]
    pub todos: Vec<SeedTodo>,
}

/// Initial todo lists handed to every new session.
///
/// Seeds carry no identifiers; they are assigned when the seed is
/// materialized for a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedData {
    lists: Vec<SeedList>,
}

impl SeedData {
    /// Creates seed data from lists.
    pub fn new(lists: Vec<SeedList>) -> Self {
        Self { lists }
    }

    /// Returns the fixture bundled with the crate.
    pub fn builtin() -> StoreResult<Self> {
        Self::from_json(BUILTIN_SEED)
    }

    /// Parses seed data from a JSON array of lists.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads seed data from a JSON file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let seed = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), lists = seed.lists.len(), "Loaded seed data");
        Ok(seed)
    }

    /// Returns the seed lists.
    pub fn lists(&self) -> &[SeedList] {
        &self.lists
    }

    /// Builds a fresh copy of the seed with newly generated identifiers.
    pub fn materialize(&self, ids: &dyn IdGenerator) -> Vec<TodoList> {
        self.lists
            .iter()
            .map(|list| {
                let todo_list_id = ids.next_id();
                let todos = list
                    .todos
                    .iter()
                    .map(|todo| Todo::new(ids.next_id(), todo.title.clone()).with_done(todo.done))
                    .collect();
                TodoList::new(todo_list_id, list.title.clone()).with_todos(todos)
            })
            .collect()
    }
}
