//! Todo list storage for the todo application
//!
//! This crate provides a storage abstraction for per-user todo lists and
//! their todos. It supports a durable SQL backend (SQLite through sqlx) and an
//! ephemeral backend that keeps lists in memory for the lifetime of a user
//! session. Both implement [`TodoStore`] and are interchangeable for callers.

mod config;
mod database;
mod error;
mod factory;
mod handler;
mod id;
mod order;
mod password;
mod seed;
mod session;
mod sql;
mod traits;

pub use config::*;
pub use database::*;
pub use entities::{Todo, TodoList};
pub use error::*;
pub use factory::*;
pub use handler::*;
pub use id::*;
pub use order::*;
pub use password::*;
pub use seed::*;
pub use session::*;
pub use sql::*;
pub use traits::*;
