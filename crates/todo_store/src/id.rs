//! Identifier generation for entities created in memory.

use std::sync::atomic::{AtomicI64, Ordering};

/// Produces identifiers for newly created todo lists and todos.
pub trait IdGenerator: Send + Sync {
    /// Returns an identifier that has not been returned before.
    fn next_id(&self) -> i64;
}

/// Monotonically increasing identifier generator.
///
/// Share one instance (through `Arc`) between every session of a process so
/// identifiers never collide.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicI64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose first identifier is 1.
    pub fn new() -> Self {
        Self::starting_after(0)
    }

    /// Creates a generator whose first identifier is `last + 1`.
    pub fn starting_after(last: i64) -> Self {
        Self {
            next: AtomicI64::new(last + 1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
