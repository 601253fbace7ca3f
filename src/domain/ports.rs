use super::contract::Contract;
use super::job::Job;
use super::profile::Profile;
use super::snapshot::LedgerSnapshot;
use super::{ContractId, JobId, ProfileId};
use crate::error::Result;
use async_trait::async_trait;

/// Writes that must land together or not at all.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LedgerBatch {
    pub profiles: Vec<Profile>,
    pub jobs: Vec<Job>,
}

impl LedgerBatch {
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }
}

/// Persistent storage for the ledger tables.
///
/// Reads see committed state only. `apply` is the single mutation path and
/// must be atomic: either every record of the batch is written or none is.
/// Implementations reject a batch that would turn a paid job back to unpaid.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn profile(&self, id: ProfileId) -> Result<Option<Profile>>;
    async fn contract(&self, id: ContractId) -> Result<Option<Contract>>;
    async fn job(&self, id: JobId) -> Result<Option<Job>>;
    async fn profiles(&self) -> Result<Vec<Profile>>;
    async fn contracts(&self) -> Result<Vec<Contract>>;
    async fn jobs(&self) -> Result<Vec<Job>>;
    async fn apply(&self, batch: LedgerBatch) -> Result<()>;
    /// Loads seed records, replacing any record with the same id.
    async fn import(&self, snapshot: LedgerSnapshot) -> Result<()>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
