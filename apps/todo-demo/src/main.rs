//! Todo store demo binary.
//!
//! Opens the configured backend for one user, creates a couple of lists and
//! logs the ordered result.

use std::{env, sync::Arc};

use todo_store::{
    Config, ErrorChannel, PasswordVerifier, Session, StoreFactory, StoreResult, TodoStore,
    catch_error, init_tracing,
};

/// Creates a list (unless it exists) and appends todos to it.
async fn add_list(
    store: Arc<dyn TodoStore>,
    title: &'static str,
    todos: Vec<&'static str>,
) -> StoreResult<Option<i64>> {
    if !store.create_list(title).await? {
        tracing::info!(title, "List already exists");
    }

    let Some(list) = store
        .sorted_todo_lists()
        .await?
        .into_iter()
        .find(|list| list.title == title)
    else {
        return Ok(None);
    };

    for todo in todos {
        store.create_todo(list.id, todo).await?;
    }
    Ok(Some(list.id))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    tracing::info!(backend = %config.backend, "Starting todo demo");

    // No credential scheme is configured for the demo, so every login fails.
    let verifier: Arc<dyn PasswordVerifier> = Arc::new(|_: &str, _: &str| false);
    let factory = StoreFactory::from_config(&config, verifier).await?;

    let (errors, mut error_rx) = ErrorChannel::new();
    let error_handler = tokio::spawn(async move {
        while let Some(error) = error_rx.recv().await {
            tracing::error!(%error, "Request failed");
        }
    });

    let username = env::var("TODOS_USER").unwrap_or_else(|_| "demo".to_string());
    let mut session = Session::new(username);
    let store: Arc<dyn TodoStore> = Arc::from(factory.for_session(&mut session));

    let handler = catch_error({
        let store = Arc::clone(&store);
        move |(title, todos): (&'static str, Vec<&'static str>)| {
            add_list(Arc::clone(&store), title, todos)
        }
    });

    let groceries = handler
        .call(("Groceries", vec!["Milk", "bread", "Apples"]), &errors)
        .await
        .flatten();
    handler.call(("Weekend", vec!["Hike"]), &errors).await;
    // Blank titles are rejected and end up in the error handler.
    handler.call(("", Vec::new()), &errors).await;

    if let Some(id) = groceries {
        store.complete_all_todos(id).await?;
    }

    for list in store.sorted_todo_lists().await? {
        let done = store.is_done_todo_list(&list);
        tracing::info!(id = list.id, title = %list.title, done, "Todo list");
        for todo in store.sorted_todos(&list).await? {
            tracing::info!(id = todo.id, title = %todo.title, done = todo.done, "Todo");
        }
    }

    drop(errors);
    error_handler.await?;

    Ok(())
}
