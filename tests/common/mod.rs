#![allow(dead_code)]

use async_trait::async_trait;
use contractor_ledger::application::service::LedgerService;
use contractor_ledger::domain::contract::Contract;
use contractor_ledger::domain::job::Job;
use contractor_ledger::domain::ports::{LedgerBatch, LedgerStore};
use contractor_ledger::domain::profile::Profile;
use contractor_ledger::domain::snapshot::LedgerSnapshot;
use contractor_ledger::domain::{ContractId, JobId, ProfileId};
use contractor_ledger::error::{LedgerError, Result};
use contractor_ledger::infrastructure::in_memory::InMemoryLedgerStore;
use contractor_ledger::interfaces::seed::load_snapshot;
use rust_decimal::Decimal;
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture_snapshot() -> LedgerSnapshot {
    load_snapshot(&fixture_path("ledger.json")).unwrap()
}

/// A service over an in-memory store seeded with `fixtures/ledger.json`.
pub async fn fixture_service() -> LedgerService {
    let service = LedgerService::new(Box::new(InMemoryLedgerStore::new()));
    service.seed(fixture_snapshot()).await.unwrap();
    service
}

pub async fn balance_of(service: &LedgerService, id: ProfileId) -> Decimal {
    service
        .profiles()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.id == id)
        .map(|p| p.balance.0)
        .unwrap()
}

pub async fn total_balance(service: &LedgerService) -> Decimal {
    service
        .profiles()
        .await
        .unwrap()
        .iter()
        .map(|p| p.balance.0)
        .sum()
}

/// Reads and imports like the in-memory store, but every batch fails.
#[derive(Default)]
pub struct FailingStore {
    inner: InMemoryLedgerStore,
}

#[async_trait]
impl LedgerStore for FailingStore {
    async fn profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        self.inner.profile(id).await
    }

    async fn contract(&self, id: ContractId) -> Result<Option<Contract>> {
        self.inner.contract(id).await
    }

    async fn job(&self, id: JobId) -> Result<Option<Job>> {
        self.inner.job(id).await
    }

    async fn profiles(&self) -> Result<Vec<Profile>> {
        self.inner.profiles().await
    }

    async fn contracts(&self) -> Result<Vec<Contract>> {
        self.inner.contracts().await
    }

    async fn jobs(&self) -> Result<Vec<Job>> {
        self.inner.jobs().await
    }

    async fn apply(&self, _batch: LedgerBatch) -> Result<()> {
        Err(LedgerError::TransactionFailure(Box::new(
            std::io::Error::other("disk full"),
        )))
    }

    async fn import(&self, snapshot: LedgerSnapshot) -> Result<()> {
        self.inner.import(snapshot).await
    }
}
