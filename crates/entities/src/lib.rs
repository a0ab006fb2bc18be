//! Core entity definitions for the todo list store.
//!
//! This crate defines the plain data types shared by every storage backend:
//! todo lists and the todo items they own.

mod todo;
mod todo_list;

pub use todo::*;
pub use todo_list::*;
