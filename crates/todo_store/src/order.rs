//! Ordering of todo lists and todos by completion state and title.

use entities::{Todo, TodoList};

/// Entities that are ordered by title.
pub trait Titled {
    /// Returns the title used for ordering.
    fn title(&self) -> &str;
}

impl Titled for Todo {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for TodoList {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Partitions `items` into undone and done groups, sorts each group by
/// case-insensitive title and returns the undone group followed by the done
/// group.
///
/// Sorting is stable, so items with equal titles keep their relative order.
pub fn order<T, F>(items: Vec<T>, is_done: F) -> Vec<T>
where
    T: Titled,
    F: Fn(&T) -> bool,
{
    let (mut undone, mut done): (Vec<T>, Vec<T>) =
        items.into_iter().partition(|item| !is_done(item));

    sort_by_title(&mut undone);
    sort_by_title(&mut done);

    undone.extend(done);
    undone
}

/// Orders todo lists: undone lists first, then done lists.
pub fn order_todo_lists(todo_lists: Vec<TodoList>) -> Vec<TodoList> {
    order(todo_lists, TodoList::is_done)
}

/// Orders todos: undone todos first, then done todos.
pub fn order_todos(todos: Vec<Todo>) -> Vec<Todo> {
    order(todos, |todo| todo.done)
}

fn sort_by_title<T: Titled>(items: &mut [T]) {
    items.sort_by_cached_key(|item| item.title().to_lowercase());
}
