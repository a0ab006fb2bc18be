//! Behaviour shared by every todo store backend.

use std::sync::Arc;

use todo_store::{
    Database, PasswordVerifier, SeedData, Session, StoreError, StoreFactory, TodoList, TodoStore,
};

async fn factories() -> Vec<StoreFactory> {
    let verifier: Arc<dyn PasswordVerifier> = Arc::new(|plain: &str, hash: &str| plain == hash);
    let db = Database::connect_in_memory().await.unwrap();

    vec![
        StoreFactory::Sql { db, verifier },
        StoreFactory::session(SeedData::default()),
    ]
}

async fn create_list(store: &dyn TodoStore, title: &str) -> TodoList {
    assert!(store.create_list(title).await.unwrap());
    store
        .sorted_todo_lists()
        .await
        .unwrap()
        .into_iter()
        .find(|list| list.title == title)
        .unwrap()
}

#[tokio::test]
async fn test_new_list_is_empty_and_undone() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);

        let list = create_list(store.as_ref(), "Groceries").await;
        assert!(list.todos.is_empty());
        assert!(!store.is_done_todo_list(&list));
        assert!(!store.has_undone_todos(&list));
        assert!(store.todo_list_title_exists("Groceries").await.unwrap());
        assert!(!store.todo_list_title_exists("groceries").await.unwrap());
    }
}

#[tokio::test]
async fn test_duplicate_titles_per_owner() {
    for factory in factories().await {
        let mut alice = Session::new("alice");
        let mut bob = Session::new("bob");
        let alice_store = factory.for_session(&mut alice);
        let bob_store = factory.for_session(&mut bob);

        assert!(alice_store.create_list("Groceries").await.unwrap());
        assert!(!alice_store.create_list("Groceries").await.unwrap());
        assert!(bob_store.create_list("Groceries").await.unwrap());
        assert_eq!(alice_store.sorted_todo_lists().await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_create_todo_round_trip() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);
        let list = create_list(store.as_ref(), "Chores").await;

        assert!(store.create_todo(list.id, "X").await.unwrap());
        assert!(!store.create_todo(list.id + 1000, "Y").await.unwrap());

        let list = store.load_todo_list(list.id).await.unwrap().unwrap();
        assert_eq!(list.todos.len(), 1);
        assert_eq!(list.todos[0].title, "X");
        assert!(!list.todos[0].done);
        assert!(store.has_undone_todos(&list));

        let todo = store
            .load_todo(list.id, list.todos[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(todo, list.todos[0]);
    }
}

#[tokio::test]
async fn test_toggle_twice_restores_state() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);
        let list = create_list(store.as_ref(), "Chores").await;
        store.create_todo(list.id, "Sweep").await.unwrap();
        let todo_id = store.load_todo_list(list.id).await.unwrap().unwrap().todos[0].id;

        assert!(store.toggle_done_todo(list.id, todo_id).await.unwrap());
        let toggled = store.load_todo(list.id, todo_id).await.unwrap().unwrap();
        assert!(toggled.done);

        assert!(store.toggle_done_todo(list.id, todo_id).await.unwrap());
        let restored = store.load_todo(list.id, todo_id).await.unwrap().unwrap();
        assert!(!restored.done);

        assert!(!store.toggle_done_todo(list.id, todo_id + 1000).await.unwrap());
        assert!(!store.toggle_done_todo(list.id + 1000, todo_id).await.unwrap());
    }
}

#[tokio::test]
async fn test_complete_all_todos() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);
        let list = create_list(store.as_ref(), "Chores").await;

        assert!(!store.complete_all_todos(list.id).await.unwrap());

        store.create_todo(list.id, "Sweep").await.unwrap();
        store.create_todo(list.id, "Mop").await.unwrap();
        assert!(store.complete_all_todos(list.id).await.unwrap());

        let list = store.load_todo_list(list.id).await.unwrap().unwrap();
        assert!(store.is_done_todo_list(&list));
        assert!(!store.has_undone_todos(&list));

        assert!(!store.complete_all_todos(list.id).await.unwrap());
        assert!(!store.complete_all_todos(list.id + 1000).await.unwrap());
    }
}

#[tokio::test]
async fn test_sorted_todo_lists_partitions_and_orders() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);

        for title in ["banana", "Apple", "cherry", "Date"] {
            create_list(store.as_ref(), title).await;
        }
        let lists = store.sorted_todo_lists().await.unwrap();
        let apple = lists.iter().find(|l| l.title == "Apple").unwrap().id;
        let cherry = lists.iter().find(|l| l.title == "cherry").unwrap().id;
        for id in [apple, cherry] {
            store.create_todo(id, "only").await.unwrap();
            store.complete_all_todos(id).await.unwrap();
        }

        let titles: Vec<String> = store
            .sorted_todo_lists()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, vec!["banana", "Date", "Apple", "cherry"]);
    }
}

#[tokio::test]
async fn test_sorted_todos() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);
        let list = create_list(store.as_ref(), "Chores").await;

        for title in ["mop", "Dust", "vacuum", "air out"] {
            store.create_todo(list.id, title).await.unwrap();
        }
        let list = store.load_todo_list(list.id).await.unwrap().unwrap();
        let vacuum = list.todos.iter().find(|t| t.title == "vacuum").unwrap().id;
        store.toggle_done_todo(list.id, vacuum).await.unwrap();

        let list = store.load_todo_list(list.id).await.unwrap().unwrap();
        let titles: Vec<String> = store
            .sorted_todos(&list)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["air out", "Dust", "mop", "vacuum"]);
    }
}

#[tokio::test]
async fn test_delete_list_removes_its_todos() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);
        let list = create_list(store.as_ref(), "Trip").await;
        store.create_todo(list.id, "Pack").await.unwrap();
        store.create_todo(list.id, "Book hotel").await.unwrap();
        let todos = store.load_todo_list(list.id).await.unwrap().unwrap().todos;

        assert!(store.delete_todo_list(list.id).await.unwrap());
        assert!(!store.delete_todo_list(list.id).await.unwrap());
        assert!(store.load_todo_list(list.id).await.unwrap().is_none());
        for todo in todos {
            assert!(store.load_todo(list.id, todo.id).await.unwrap().is_none());
        }
    }
}

#[tokio::test]
async fn test_delete_todo() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);
        let list = create_list(store.as_ref(), "Trip").await;
        store.create_todo(list.id, "Pack").await.unwrap();
        store.create_todo(list.id, "Book hotel").await.unwrap();
        let todos = store.load_todo_list(list.id).await.unwrap().unwrap().todos;

        assert!(store.delete_todo(list.id, todos[1].id).await.unwrap());
        assert!(!store.delete_todo(list.id, todos[1].id).await.unwrap());

        let remaining = store.load_todo_list(list.id).await.unwrap().unwrap().todos;
        assert_eq!(remaining, vec![todos[0].clone()]);
    }
}

#[tokio::test]
async fn test_rename_list() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);
        let list = create_list(store.as_ref(), "Trip").await;
        create_list(store.as_ref(), "Work").await;

        assert!(store.set_todo_list_title(list.id, "Vacation").await.unwrap());
        assert_eq!(
            store.load_todo_list(list.id).await.unwrap().unwrap().title,
            "Vacation"
        );
        assert!(matches!(
            store.set_todo_list_title(list.id, "Work").await,
            Err(StoreError::DuplicateTitle(_))
        ));
        assert!(!store.set_todo_list_title(list.id + 1000, "Other").await.unwrap());
    }
}

#[tokio::test]
async fn test_returned_lists_are_detached() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);
        let list = create_list(store.as_ref(), "Trip").await;
        store.create_todo(list.id, "Pack").await.unwrap();

        let mut loaded = store.load_todo_list(list.id).await.unwrap().unwrap();
        loaded.title.push_str(" (edited)");
        loaded.todos[0].done = true;
        let mut sorted = store.sorted_todos(&loaded).await.unwrap();
        sorted.clear();

        let reloaded = store.load_todo_list(list.id).await.unwrap().unwrap();
        assert_eq!(reloaded.title, "Trip");
        assert_eq!(reloaded.todos.len(), 1);
        assert!(!reloaded.todos[0].done);
    }
}

#[tokio::test]
async fn test_blank_titles_are_invalid() {
    for factory in factories().await {
        let mut session = Session::new("alice");
        let store = factory.for_session(&mut session);
        let list = create_list(store.as_ref(), "Trip").await;

        assert!(matches!(
            store.create_list("").await,
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            store.create_todo(list.id, "  ").await,
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            store.set_todo_list_title(list.id, "").await,
            Err(StoreError::InvalidInput(_))
        ));
    }
}
