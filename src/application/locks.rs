use crate::domain::{JobId, ProfileId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A lockable ledger row.
///
/// The derived ordering puts every job before every profile, which is the
/// order locks must be taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    Job(JobId),
    Profile(ProfileId),
}

/// Per-row async locks shared by every operation that writes the ledger.
///
/// Entries are created on demand and dropped once nobody holds or waits on
/// them.
#[derive(Default)]
pub struct RowLocks {
    rows: Mutex<HashMap<RowKey, Arc<AsyncMutex<()>>>>,
}

/// Guards held for the lifetime of a ledger transaction.
#[must_use]
pub struct RowGuards {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl RowLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, key: RowKey) -> Arc<AsyncMutex<()>> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        rows.retain(|_, cell| Arc::strong_count(cell) > 1);
        rows.entry(key).or_default().clone()
    }

    /// Waits for exclusive access to one row.
    pub async fn lock(&self, key: RowKey) -> RowGuards {
        RowGuards {
            _guards: vec![self.cell(key).lock_owned().await],
        }
    }

    /// Waits for exclusive access to several rows, taken in ascending key order.
    pub async fn lock_all(&self, keys: impl IntoIterator<Item = RowKey>) -> RowGuards {
        let mut keys: Vec<RowKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.cell(key).lock_owned().await);
        }
        RowGuards { _guards: guards }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
