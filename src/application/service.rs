use super::locks::RowLocks;
use crate::domain::ports::{LedgerBatch, LedgerStoreBox};
use crate::domain::profile::Profile;
use crate::domain::snapshot::LedgerSnapshot;
use crate::domain::ProfileId;
use crate::error::{LedgerError, Result};

/// Default number of entries returned by the best-clients report.
pub const DEFAULT_BEST_CLIENTS_LIMIT: usize = 2;

/// The entry point for every ledger operation.
///
/// `LedgerService` owns the storage backend and the row locks that give
/// payments and deposits their isolation. It is shared between concurrent
/// requests behind an `Arc`; each operation takes the locks it needs for
/// its own duration only.
pub struct LedgerService {
    pub(crate) store: LedgerStoreBox,
    pub(crate) locks: RowLocks,
    pub(crate) best_clients_limit: usize,
}

impl LedgerService {
    /// Creates a new `LedgerService` over the given store.
    pub fn new(store: LedgerStoreBox) -> Self {
        Self {
            store,
            locks: RowLocks::new(),
            best_clients_limit: DEFAULT_BEST_CLIENTS_LIMIT,
        }
    }

    /// Overrides the default size of the best-clients report.
    pub fn with_best_clients_limit(mut self, limit: usize) -> Self {
        self.best_clients_limit = limit;
        self
    }

    /// Validates a snapshot and loads it into the store.
    pub async fn seed(&self, snapshot: LedgerSnapshot) -> Result<()> {
        snapshot.validate()?;
        tracing::info!(
            profiles = snapshot.profiles.len(),
            contracts = snapshot.contracts.len(),
            jobs = snapshot.jobs.len(),
            "Seeding ledger"
        );
        self.store.import(snapshot).await
    }

    /// Resolves the caller identity attached to a request.
    pub async fn resolve_caller(&self, profile_id: ProfileId) -> Result<Profile> {
        self.store
            .profile(profile_id)
            .await?
            .ok_or(LedgerError::Unauthenticated)
    }

    /// Current state of every profile, ordered by id.
    pub async fn profiles(&self) -> Result<Vec<Profile>> {
        let mut profiles = self.store.profiles().await?;
        profiles.sort_by_key(|p| p.id);
        Ok(profiles)
    }

    /// Commits a batch, logging store failures distinctly from caller errors.
    pub(crate) async fn commit(&self, batch: LedgerBatch) -> Result<()> {
        self.store.apply(batch).await.inspect_err(|e| {
            tracing::error!(error = %e, "Ledger batch rejected; nothing was written");
        })
    }
}
