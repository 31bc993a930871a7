//! Server state management
//!
//! One pool of users, brackets and results shared by every request.

use bracket_core::Pool;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Server-wide shared state
///
/// Every mutation holds the write lock for exactly one store operation, so
/// concurrent writes to the same bracket or result are applied one at a
/// time and the last writer wins.
pub struct ServerState {
    pool: RwLock<Pool>,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_pool(Pool::new())
    }

    /// Start from an existing pool
    pub fn with_pool(pool: Pool) -> Self {
        Self {
            pool: RwLock::new(pool),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Pool> {
        // Pool mutations validate before writing, so a panicking reader or
        // writer cannot leave it half-updated
        self.pool.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Pool> {
        self.pool.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
