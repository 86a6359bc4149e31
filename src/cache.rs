use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::parser::Program;

/// Compiled programs, keyed by normalized expression.
///
/// Expressions are immutable, so entries never go stale. The cache holds at
/// most `capacity` programs: inserting into a full cache empties it first.
#[derive(Debug)]
pub struct Cache {
    data: HashMap<String, Arc<Program>>,
    capacity: usize,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl Cache {
    /// Create a cache holding at most `capacity` programs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: HashMap::new(),
            capacity,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Number of cached programs.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reset the cache.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the cached program.
    pub fn get(&self, key: &str) -> Option<Arc<Program>> {
        match self.data.get(key) {
            Some(program) => {
                self.hits.set(self.hits.get() + 1);
                Some(Arc::clone(program))
            }
            None => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    /// Insert a program into the cache.
    pub fn insert(&mut self, key: String, program: Arc<Program>) {
        if self.capacity == 0 {
            return;
        }
        if self.data.len() >= self.capacity && !self.data.contains_key(&key) {
            log::debug!("program cache full ({} entries), clearing", self.data.len());
            self.data.clear();
        }
        self.data.insert(key, program);
    }
}
