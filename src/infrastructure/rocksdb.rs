use crate::domain::contract::Contract;
use crate::domain::job::Job;
use crate::domain::ports::{LedgerBatch, LedgerStore};
use crate::domain::profile::Profile;
use crate::domain::snapshot::LedgerSnapshot;
use crate::domain::{ContractId, JobId, ProfileId};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for profiles.
pub const CF_PROFILES: &str = "profiles";
/// Column Family for contracts.
pub const CF_CONTRACTS: &str = "contracts";
/// Column Family for jobs.
pub const CF_JOBS: &str = "jobs";

/// A persistent ledger backed by RocksDB.
///
/// Each table lives in its own Column Family, keyed by the big-endian record
/// id with a JSON value. Batches are committed through a single `WriteBatch`,
/// which RocksDB applies atomically.
///
/// The paid-job check in `apply` reads before it writes; callers serialise
/// writers to the same job (see `RowLocks`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_PROFILES, CF_CONTRACTS, CF_JOBS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &'static str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            LedgerError::storage(std::io::Error::other(format!(
                "{} column family not found",
                name
            )))
        })
    }

    fn get<T: DeserializeOwned>(&self, name: &'static str, id: u32) -> Result<Option<T>> {
        let cf = self.cf(name)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, name: &'static str) -> Result<Vec<T>> {
        let cf = self.cf(name)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(decode(&value)?);
        }
        Ok(records)
    }

    fn put<T: Serialize>(
        &self,
        batch: &mut WriteBatch,
        name: &'static str,
        id: u32,
        value: &T,
    ) -> Result<()> {
        let cf = self.cf(name)?;
        batch.put_cf(cf, id.to_be_bytes(), encode(value)?);
        Ok(())
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(LedgerError::storage)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(LedgerError::storage)
}

#[async_trait]
impl LedgerStore for RocksDBStore {
    async fn profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        self.get(CF_PROFILES, id)
    }

    async fn contract(&self, id: ContractId) -> Result<Option<Contract>> {
        self.get(CF_CONTRACTS, id)
    }

    async fn job(&self, id: JobId) -> Result<Option<Job>> {
        self.get(CF_JOBS, id)
    }

    async fn profiles(&self) -> Result<Vec<Profile>> {
        self.scan(CF_PROFILES)
    }

    async fn contracts(&self) -> Result<Vec<Contract>> {
        self.scan(CF_CONTRACTS)
    }

    async fn jobs(&self) -> Result<Vec<Job>> {
        self.scan(CF_JOBS)
    }

    async fn apply(&self, batch: LedgerBatch) -> Result<()> {
        let mut write = WriteBatch::default();

        for job in &batch.jobs {
            if let Some(current) = self.get::<Job>(CF_JOBS, job.id)?
                && !current.can_become(job)
            {
                return Err(LedgerError::DataIntegrity(format!(
                    "job {} cannot return to unpaid",
                    job.id
                )));
            }
            self.put(&mut write, CF_JOBS, job.id, job)?;
        }
        for profile in &batch.profiles {
            self.put(&mut write, CF_PROFILES, profile.id, profile)?;
        }

        self.db.write(write)?;
        Ok(())
    }

    async fn import(&self, snapshot: LedgerSnapshot) -> Result<()> {
        let mut write = WriteBatch::default();
        for profile in &snapshot.profiles {
            self.put(&mut write, CF_PROFILES, profile.id, profile)?;
        }
        for contract in &snapshot.contracts {
            self.put(&mut write, CF_CONTRACTS, contract.id, contract)?;
        }
        for job in &snapshot.jobs {
            self.put(&mut write, CF_JOBS, job.id, job)?;
        }
        self.db.write(write)?;
        Ok(())
    }
}
