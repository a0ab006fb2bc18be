//! Durable todo store backed by SQL.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{Todo, TodoList};
use sqlx::FromRow;

use crate::{
    error::validate_title, order_todo_lists, order_todos, Database, PasswordVerifier, StoreError,
    StoreResult, TodoStore,
};

/// Database row for TodoList
#[derive(Debug, FromRow)]
struct TodoListRow {
    id: i64,
    title: String,
}

impl TodoListRow {
    fn into_todo_list(self, todos: Vec<Todo>) -> TodoList {
        TodoList::new(self.id, self.title).with_todos(todos)
    }
}

/// Database row for Todo
#[derive(Debug, FromRow)]
struct TodoRow {
    id: i64,
    title: String,
    done: bool,
    todo_list_id: i64,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo::new(row.id, row.title).with_done(row.done)
    }
}

/// Todo store that persists every change to the database.
///
/// Every statement is filtered by the owner the store was created for.
/// Statements run independently without an enclosing transaction, so a read
/// made of two queries is not atomic against concurrent writers.
pub struct SqlTodoStore {
    db: Database,
    username: String,
    verifier: Arc<dyn PasswordVerifier>,
}

impl SqlTodoStore {
    /// Creates a store scoped to `username`.
    pub fn new(
        db: Database,
        username: impl Into<String>,
        verifier: Arc<dyn PasswordVerifier>,
    ) -> Self {
        Self {
            db,
            username: username.into(),
            verifier,
        }
    }

    /// Returns the owner this store is scoped to.
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Returns true if the error reports a violated unique constraint.
fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_error) if db_error.is_unique_violation())
}

#[async_trait]
impl TodoStore for SqlTodoStore {
    async fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT password FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(self.db.pool())
                .await?;

        match hash {
            Some(hash) => self.verifier.verify(password, &hash).await,
            None => {
                tracing::debug!(username, "Unknown user");
                Ok(false)
            }
        }
    }

    async fn create_list(&self, title: &str) -> StoreResult<bool> {
        validate_title(title)?;

        let result = sqlx::query("INSERT INTO todolists (title, username) VALUES ($1, $2)")
            .bind(title)
            .bind(&self.username)
            .execute(self.db.pool())
            .await;

        match result {
            Ok(result) => {
                tracing::info!(title, username = %self.username, "Created todo list");
                Ok(result.rows_affected() > 0)
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!(title, username = %self.username, "Todo list title already exists");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn load_todo_list(&self, todo_list_id: i64) -> StoreResult<Option<TodoList>> {
        let find_todo_list = sqlx::query_as::<_, TodoListRow>(
            "SELECT id, title FROM todolists WHERE id = $1 AND username = $2",
        )
        .bind(todo_list_id)
        .bind(&self.username)
        .fetch_optional(self.db.pool());

        let find_todos = sqlx::query_as::<_, TodoRow>(
            "SELECT id, title, done, todo_list_id FROM todos
             WHERE todo_list_id = $1 AND username = $2
             ORDER BY id",
        )
        .bind(todo_list_id)
        .bind(&self.username)
        .fetch_all(self.db.pool());

        let (todo_list, todos) = tokio::try_join!(find_todo_list, find_todos)?;

        Ok(todo_list
            .map(|row| row.into_todo_list(todos.into_iter().map(Todo::from).collect())))
    }

    async fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>> {
        let all_todo_lists = sqlx::query_as::<_, TodoListRow>(
            "SELECT id, title FROM todolists WHERE username = $1 ORDER BY id",
        )
        .bind(&self.username)
        .fetch_all(self.db.pool());

        let all_todos = sqlx::query_as::<_, TodoRow>(
            "SELECT id, title, done, todo_list_id FROM todos WHERE username = $1 ORDER BY id",
        )
        .bind(&self.username)
        .fetch_all(self.db.pool());

        let (todo_lists, todos) = tokio::try_join!(all_todo_lists, all_todos)?;

        let mut todos_by_list: HashMap<i64, Vec<Todo>> = HashMap::new();
        for row in todos {
            todos_by_list
                .entry(row.todo_list_id)
                .or_default()
                .push(row.into());
        }

        let todo_lists = todo_lists
            .into_iter()
            .map(|row| {
                let todos = todos_by_list.remove(&row.id).unwrap_or_default();
                row.into_todo_list(todos)
            })
            .collect();

        Ok(order_todo_lists(todo_lists))
    }

    async fn set_todo_list_title(&self, todo_list_id: i64, title: &str) -> StoreResult<bool> {
        validate_title(title)?;

        let result = sqlx::query("UPDATE todolists SET title = $1 WHERE id = $2 AND username = $3")
            .bind(title)
            .bind(todo_list_id)
            .bind(&self.username)
            .execute(self.db.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::duplicate_title(title)
                } else {
                    e.into()
                }
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn todo_list_title_exists(&self, title: &str) -> StoreResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM todolists WHERE title = $1 AND username = $2")
                .bind(title)
                .bind(&self.username)
                .fetch_one(self.db.pool())
                .await?;

        Ok(count > 0)
    }

    async fn delete_todo_list(&self, todo_list_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM todolists WHERE id = $1 AND username = $2")
            .bind(todo_list_id)
            .bind(&self.username)
            .execute(self.db.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(todo_list_id, username = %self.username, "Deleted todo list");
        }
        Ok(deleted)
    }

    async fn complete_all_todos(&self, todo_list_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE todos SET done = TRUE WHERE todo_list_id = $1 AND NOT done AND username = $2",
        )
        .bind(todo_list_id)
        .bind(&self.username)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn load_todo(&self, todo_list_id: i64, todo_id: i64) -> StoreResult<Option<Todo>> {
        let row: Option<TodoRow> = sqlx::query_as(
            "SELECT id, title, done, todo_list_id FROM todos
             WHERE todo_list_id = $1 AND id = $2 AND username = $3",
        )
        .bind(todo_list_id)
        .bind(todo_id)
        .bind(&self.username)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Todo::from))
    }

    async fn sorted_todos(&self, todo_list: &TodoList) -> StoreResult<Vec<Todo>> {
        let rows: Vec<TodoRow> = sqlx::query_as(
            "SELECT id, title, done, todo_list_id FROM todos
             WHERE todo_list_id = $1 AND username = $2
             ORDER BY id",
        )
        .bind(todo_list.id)
        .bind(&self.username)
        .fetch_all(self.db.pool())
        .await?;

        Ok(order_todos(rows.into_iter().map(Todo::from).collect()))
    }

    async fn create_todo(&self, todo_list_id: i64, title: &str) -> StoreResult<bool> {
        validate_title(title)?;

        // Selecting the owning list keeps the insert scoped to the owner and
        // turns a missing list into zero affected rows.
        let result = sqlx::query(
            "INSERT INTO todos (title, todo_list_id, username)
             SELECT $1, id, username FROM todolists WHERE id = $2 AND username = $3",
        )
        .bind(title)
        .bind(todo_list_id)
        .bind(&self.username)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_done_todo(&self, todo_list_id: i64, todo_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE todos SET done = NOT done WHERE todo_list_id = $1 AND id = $2 AND username = $3",
        )
        .bind(todo_list_id)
        .bind(todo_id)
        .bind(&self.username)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_todo(&self, todo_list_id: i64, todo_id: i64) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM todos WHERE todo_list_id = $1 AND id = $2 AND username = $3")
                .bind(todo_list_id)
                .bind(todo_id)
                .bind(&self.username)
                .execute(self.db.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_verifier() -> Arc<dyn PasswordVerifier> {
        Arc::new(|plain: &str, hash: &str| plain == hash)
    }

    fn store_for(db: &Database, username: &str) -> SqlTodoStore {
        SqlTodoStore::new(db.clone(), username, plain_verifier())
    }

    async fn list_id(store: &SqlTodoStore, title: &str) -> i64 {
        store
            .sorted_todo_lists()
            .await
            .unwrap()
            .into_iter()
            .find(|l| l.title == title)
            .map(|l| l.id)
            .unwrap()
    }

    #[tokio::test]
    async fn test_authenticate() {
        let db = Database::connect_in_memory().await.unwrap();
        db.create_user("admin", "secret").await.unwrap();
        let store = store_for(&db, "admin");

        assert!(store.authenticate("admin", "secret").await.unwrap());
        assert!(!store.authenticate("admin", "wrong").await.unwrap());
        assert!(!store.authenticate("nobody", "secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_title_is_scoped_to_owner() {
        let db = Database::connect_in_memory().await.unwrap();
        let alice = store_for(&db, "alice");
        let bob = store_for(&db, "bob");

        assert!(alice.create_list("Groceries").await.unwrap());
        assert!(!alice.create_list("Groceries").await.unwrap());
        assert!(bob.create_list("Groceries").await.unwrap());
    }

    #[tokio::test]
    async fn test_owner_cannot_see_other_lists() {
        let db = Database::connect_in_memory().await.unwrap();
        let alice = store_for(&db, "alice");
        let bob = store_for(&db, "bob");

        alice.create_list("Private").await.unwrap();
        let id = list_id(&alice, "Private").await;
        alice.create_todo(id, "Secret plan").await.unwrap();

        assert!(bob.load_todo_list(id).await.unwrap().is_none());
        assert!(bob.sorted_todo_lists().await.unwrap().is_empty());
        assert!(!bob.create_todo(id, "Intrusion").await.unwrap());
        assert!(!bob.delete_todo_list(id).await.unwrap());
        assert!(!bob.complete_all_todos(id).await.unwrap());
        assert!(!bob.todo_list_title_exists("Private").await.unwrap());

        let list = alice.load_todo_list(id).await.unwrap().unwrap();
        assert_eq!(list.todos.len(), 1);
    }

    #[tokio::test]
    async fn test_rename_to_existing_title() {
        let db = Database::connect_in_memory().await.unwrap();
        let store = store_for(&db, "alice");
        store.create_list("Work").await.unwrap();
        store.create_list("Home").await.unwrap();
        let id = list_id(&store, "Home").await;

        let result = store.set_todo_list_title(id, "Work").await;
        assert!(matches!(result, Err(StoreError::DuplicateTitle(_))));
        assert!(store.set_todo_list_title(id, "House").await.unwrap());
        assert!(!store.set_todo_list_title(id + 100, "Elsewhere").await.unwrap());
    }

    #[tokio::test]
    async fn test_other_database_errors_propagate() {
        let db = Database::connect_in_memory().await.unwrap();
        let store = store_for(&db, "alice");
        sqlx::query("DROP TABLE todos").execute(db.pool()).await.unwrap();
        sqlx::query("DROP TABLE todolists").execute(db.pool()).await.unwrap();

        assert!(matches!(
            store.create_list("Work").await,
            Err(StoreError::Database(_))
        ));
        assert!(matches!(
            store.load_todo_list(1).await,
            Err(StoreError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_list_cascades_to_todos() {
        let db = Database::connect_in_memory().await.unwrap();
        let store = store_for(&db, "alice");
        store.create_list("Errands").await.unwrap();
        let id = list_id(&store, "Errands").await;
        store.create_todo(id, "Post office").await.unwrap();

        assert!(store.delete_todo_list(id).await.unwrap());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let db = Database::connect_in_memory().await.unwrap();
        let store = store_for(&db, "alice");

        assert!(matches!(
            store.create_list(" ").await,
            Err(StoreError::InvalidInput(_))
        ));
    }
}
