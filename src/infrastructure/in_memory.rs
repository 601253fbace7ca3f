use crate::domain::contract::Contract;
use crate::domain::job::Job;
use crate::domain::ports::{LedgerBatch, LedgerStore};
use crate::domain::profile::Profile;
use crate::domain::snapshot::LedgerSnapshot;
use crate::domain::{ContractId, JobId, ProfileId};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    profiles: BTreeMap<ProfileId, Profile>,
    contracts: BTreeMap<ContractId, Contract>,
    jobs: BTreeMap<JobId, Job>,
}

/// A thread-safe in-memory ledger.
///
/// All three tables sit behind one `RwLock`, so a batch is applied under a
/// single write guard and readers never see half of it.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.get(&id).cloned())
    }

    async fn contract(&self, id: ContractId) -> Result<Option<Contract>> {
        let tables = self.tables.read().await;
        Ok(tables.contracts.get(&id).cloned())
    }

    async fn job(&self, id: JobId) -> Result<Option<Job>> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.get(&id).cloned())
    }

    async fn profiles(&self) -> Result<Vec<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.values().cloned().collect())
    }

    async fn contracts(&self) -> Result<Vec<Contract>> {
        let tables = self.tables.read().await;
        Ok(tables.contracts.values().cloned().collect())
    }

    async fn jobs(&self) -> Result<Vec<Job>> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.values().cloned().collect())
    }

    async fn apply(&self, batch: LedgerBatch) -> Result<()> {
        let mut tables = self.tables.write().await;

        // Validate everything before touching anything.
        for job in &batch.jobs {
            if let Some(current) = tables.jobs.get(&job.id)
                && !current.can_become(job)
            {
                return Err(LedgerError::DataIntegrity(format!(
                    "job {} cannot return to unpaid",
                    job.id
                )));
            }
        }

        for profile in batch.profiles {
            tables.profiles.insert(profile.id, profile);
        }
        for job in batch.jobs {
            tables.jobs.insert(job.id, job);
        }
        Ok(())
    }

    async fn import(&self, snapshot: LedgerSnapshot) -> Result<()> {
        let mut tables = self.tables.write().await;
        for profile in snapshot.profiles {
            tables.profiles.insert(profile.id, profile);
        }
        for contract in snapshot.contracts {
            tables.contracts.insert(contract.id, contract);
        }
        for job in snapshot.jobs {
            tables.jobs.insert(job.id, job);
        }
        Ok(())
    }
}
