//! Todo store trait definitions.

use async_trait::async_trait;
use entities::{Todo, TodoList};

use crate::StoreResult;

/// Trait for todo list storage operations.
///
/// Every operation is scoped to the owner the store was constructed for;
/// no method takes an owner key. Missing lists or todos are reported as
/// `false` or `None`, and errors are reserved for transport failures and
/// invalid input. Every value returned is an independent copy.
#[async_trait]
pub trait TodoStore: Send + Sync {
    // =========================================================================
    // Authentication
    // =========================================================================

    /// Checks `password` against the stored hash for `username`.
    ///
    /// Returns `false` when the user does not exist.
    async fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool>;

    // =========================================================================
    // Todo list operations
    // =========================================================================

    /// Creates a new, empty todo list.
    ///
    /// Returns `false` if the owner already has a list with this title.
    async fn create_list(&self, title: &str) -> StoreResult<bool>;

    /// Loads a todo list with its todos.
    async fn load_todo_list(&self, todo_list_id: i64) -> StoreResult<Option<TodoList>>;

    /// Returns all todo lists, undone lists first, each group ordered by
    /// case-insensitive title.
    async fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>>;

    /// Renames a todo list.
    ///
    /// Returns `false` if the list does not exist.
    async fn set_todo_list_title(&self, todo_list_id: i64, title: &str) -> StoreResult<bool>;

    /// Returns true if the owner has a list with exactly this title.
    async fn todo_list_title_exists(&self, title: &str) -> StoreResult<bool>;

    /// Deletes a todo list and all of its todos.
    async fn delete_todo_list(&self, todo_list_id: i64) -> StoreResult<bool>;

    /// Marks every undone todo of the list as done.
    ///
    /// Returns `true` only if at least one todo changed state.
    async fn complete_all_todos(&self, todo_list_id: i64) -> StoreResult<bool>;

    // =========================================================================
    // Todo operations
    // =========================================================================

    /// Loads a single todo.
    async fn load_todo(&self, todo_list_id: i64, todo_id: i64) -> StoreResult<Option<Todo>>;

    /// Returns the todos of a list, undone first, each group ordered by
    /// case-insensitive title.
    async fn sorted_todos(&self, todo_list: &TodoList) -> StoreResult<Vec<Todo>>;

    /// Appends a new, not-done todo to a list.
    ///
    /// Returns `false` if the list does not exist.
    async fn create_todo(&self, todo_list_id: i64, title: &str) -> StoreResult<bool>;

    /// Flips the done state of a todo.
    async fn toggle_done_todo(&self, todo_list_id: i64, todo_id: i64) -> StoreResult<bool>;

    /// Deletes a todo.
    async fn delete_todo(&self, todo_list_id: i64, todo_id: i64) -> StoreResult<bool>;

    // =========================================================================
    // Predicates
    // =========================================================================

    /// Returns true if the list has at least one todo and all are done.
    fn is_done_todo_list(&self, todo_list: &TodoList) -> bool {
        todo_list.is_done()
    }

    /// Returns true if any todo of the list is not done.
    fn has_undone_todos(&self, todo_list: &TodoList) -> bool {
        todo_list.has_undone_todos()
    }
}
