//! Ephemeral todo store that keeps a session's todo lists in memory.

use std::sync::Arc;

use async_trait::async_trait;
use entities::{Todo, TodoList};
use tokio::sync::RwLock;

use crate::{
    error::validate_title, order_todo_lists, order_todos, IdGenerator, SeedData, StoreError,
    StoreResult, TodoStore,
};

/// Todo lists attached to a session.
pub type SessionLists = Arc<RwLock<Vec<TodoList>>>;

/// The per-user session a store is created for.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Owner key of the session.
    pub username: String,
    /// Lists kept by the session backend, attached on first use.
    pub todo_lists: Option<SessionLists>,
}

impl Session {
    /// Creates a session for `username` with no attached lists.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            todo_lists: None,
        }
    }
}

/// Todo store that keeps lists in the user's session.
///
/// Reads hand out clones, so callers can never modify the session's lists
/// through a returned value. Writes change the session's lists in place.
pub struct SessionTodoStore {
    todo_lists: SessionLists,
    username: String,
    ids: Arc<dyn IdGenerator>,
}

impl SessionTodoStore {
    /// Creates a store over the session's lists.
    ///
    /// A session without lists gets a fresh copy of `seed`, which stays
    /// attached to the session for later requests.
    pub fn new(session: &mut Session, seed: &SeedData, ids: Arc<dyn IdGenerator>) -> Self {
        let todo_lists = session
            .todo_lists
            .get_or_insert_with(|| {
                tracing::debug!(username = %session.username, "Seeding session todo lists");
                Arc::new(RwLock::new(seed.materialize(ids.as_ref())))
            })
            .clone();

        Self {
            todo_lists,
            username: session.username.clone(),
            ids,
        }
    }

    /// Returns the owner this store is scoped to.
    pub fn username(&self) -> &str {
        &self.username
    }
}

fn find_todo_list(todo_lists: &[TodoList], todo_list_id: i64) -> Option<&TodoList> {
    todo_lists.iter().find(|list| list.id == todo_list_id)
}

fn find_todo_list_mut(todo_lists: &mut [TodoList], todo_list_id: i64) -> Option<&mut TodoList> {
    todo_lists.iter_mut().find(|list| list.id == todo_list_id)
}

#[async_trait]
impl TodoStore for SessionTodoStore {
    async fn authenticate(&self, _username: &str, _password: &str) -> StoreResult<bool> {
        Err(StoreError::Unsupported("authenticate"))
    }

    async fn create_list(&self, title: &str) -> StoreResult<bool> {
        validate_title(title)?;

        let mut todo_lists = self.todo_lists.write().await;
        if todo_lists.iter().any(|list| list.title == title) {
            tracing::warn!(title, username = %self.username, "Todo list title already exists");
            return Ok(false);
        }

        todo_lists.push(TodoList::new(self.ids.next_id(), title));
        tracing::info!(title, username = %self.username, "Created todo list");
        Ok(true)
    }

    async fn load_todo_list(&self, todo_list_id: i64) -> StoreResult<Option<TodoList>> {
        let todo_lists = self.todo_lists.read().await;
        Ok(find_todo_list(&todo_lists, todo_list_id).cloned())
    }

    async fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>> {
        let todo_lists = self.todo_lists.read().await;
        Ok(order_todo_lists(todo_lists.clone()))
    }

    async fn set_todo_list_title(&self, todo_list_id: i64, title: &str) -> StoreResult<bool> {
        validate_title(title)?;

        let mut todo_lists = self.todo_lists.write().await;
        let Some(index) = todo_lists.iter().position(|list| list.id == todo_list_id) else {
            return Ok(false);
        };

        if todo_lists
            .iter()
            .any(|list| list.id != todo_list_id && list.title == title)
        {
            return Err(StoreError::duplicate_title(title));
        }

        todo_lists[index].title = title.to_string();
        Ok(true)
    }

    async fn todo_list_title_exists(&self, title: &str) -> StoreResult<bool> {
        let todo_lists = self.todo_lists.read().await;
        Ok(todo_lists.iter().any(|list| list.title == title))
    }

    async fn delete_todo_list(&self, todo_list_id: i64) -> StoreResult<bool> {
        let mut todo_lists = self.todo_lists.write().await;
        let Some(index) = todo_lists.iter().position(|list| list.id == todo_list_id) else {
            return Ok(false);
        };

        todo_lists.remove(index);
        tracing::info!(todo_list_id, username = %self.username, "Deleted todo list");
        Ok(true)
    }

    async fn complete_all_todos(&self, todo_list_id: i64) -> StoreResult<bool> {
        let mut todo_lists = self.todo_lists.write().await;
        let Some(todo_list) = find_todo_list_mut(&mut todo_lists, todo_list_id) else {
            return Ok(false);
        };

        let mut completed = 0;
        for todo in todo_list.todos.iter_mut().filter(|todo| !todo.done) {
            todo.done = true;
            completed += 1;
        }

        Ok(completed > 0)
    }

    async fn load_todo(&self, todo_list_id: i64, todo_id: i64) -> StoreResult<Option<Todo>> {
        let todo_lists = self.todo_lists.read().await;
        Ok(find_todo_list(&todo_lists, todo_list_id)
            .and_then(|list| list.find_todo(todo_id))
            .cloned())
    }

    async fn sorted_todos(&self, todo_list: &TodoList) -> StoreResult<Vec<Todo>> {
        Ok(order_todos(todo_list.todos.clone()))
    }

    async fn create_todo(&self, todo_list_id: i64, title: &str) -> StoreResult<bool> {
        validate_title(title)?;

        let mut todo_lists = self.todo_lists.write().await;
        let Some(todo_list) = find_todo_list_mut(&mut todo_lists, todo_list_id) else {
            return Ok(false);
        };

        todo_list.todos.push(Todo::new(self.ids.next_id(), title));
        Ok(true)
    }

    async fn toggle_done_todo(&self, todo_list_id: i64, todo_id: i64) -> StoreResult<bool> {
        let mut todo_lists = self.todo_lists.write().await;
        let todo = find_todo_list_mut(&mut todo_lists, todo_list_id)
            .and_then(|list| list.find_todo_mut(todo_id));

        match todo {
            Some(todo) => {
                todo.toggle();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_todo(&self, todo_list_id: i64, todo_id: i64) -> StoreResult<bool> {
        let mut todo_lists = self.todo_lists.write().await;
        let Some(todo_list) = find_todo_list_mut(&mut todo_lists, todo_list_id) else {
            return Ok(false);
        };
        let Some(index) = todo_list.todos.iter().position(|todo| todo.id == todo_id) else {
            return Ok(false);
        };

        todo_list.todos.remove(index);
        Ok(true)
    }
}
