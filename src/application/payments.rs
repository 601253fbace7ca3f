use super::locks::RowKey;
use super::service::LedgerService;
use crate::domain::contract::Contract;
use crate::domain::job::Job;
use crate::domain::money::Balance;
use crate::domain::ports::LedgerBatch;
use crate::domain::profile::Profile;
use crate::domain::{JobId, ProfileId};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Confirmation of a settled job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub job_id: JobId,
    pub client_id: ProfileId,
    pub contractor_id: ProfileId,
    pub amount: Balance,
    pub paid_at: DateTime<Utc>,
    pub client_balance: Balance,
}

impl LedgerService {
    /// Pays a job on behalf of the client that owns it.
    ///
    /// Checks, in order: the caller is a client, the job is payable and
    /// belongs to the caller, the contractor exists, the client balance
    /// covers the price. Then the job, the client and the contractor are
    /// written in one batch.
    ///
    /// The job row is locked before the payability check and both profile
    /// rows before their balances are read, so two concurrent payments of
    /// the same job settle exactly once.
    pub async fn pay_job(&self, job_id: JobId, caller: &Profile) -> Result<PaymentReceipt> {
        if !caller.is_client() {
            tracing::warn!(caller = caller.id, job_id, "Non-client tried to pay a job");
            return Err(LedgerError::NotAuthorized(caller.id));
        }

        let _job_guard = self.locks.lock(RowKey::Job(job_id)).await;

        let (mut job, contract) = self
            .payable_job(job_id, caller.id)
            .await?
            .ok_or(LedgerError::JobNotFound(job_id))?;

        let _profile_guards = self
            .locks
            .lock_all([
                RowKey::Profile(contract.client_id),
                RowKey::Profile(contract.contractor_id),
            ])
            .await;

        let mut client = self.store.profile(contract.client_id).await?.ok_or_else(|| {
            integrity_failure(format!(
                "contract {} references missing client {}",
                contract.id, contract.client_id
            ))
        })?;
        let mut contractor = self
            .store
            .profile(contract.contractor_id)
            .await?
            .filter(Profile::is_contractor)
            .ok_or_else(|| {
                integrity_failure(format!(
                    "contract {} references missing contractor {}",
                    contract.id, contract.contractor_id
                ))
            })?;

        client.debit(job.price)?;
        contractor.credit(job.price).inspect_err(|e| {
            tracing::error!(error = %e, job_id, "Contractor balance out of range");
        })?;
        let paid_at = Utc::now();
        job.mark_paid(paid_at)?;

        let receipt = PaymentReceipt {
            job_id,
            client_id: client.id,
            contractor_id: contractor.id,
            amount: job.price,
            paid_at,
            client_balance: client.balance,
        };

        self.commit(
            LedgerBatch::default()
                .with_job(job)
                .with_profile(client)
                .with_profile(contractor),
        )
        .await?;

        tracing::info!(
            job_id,
            client = receipt.client_id,
            contractor = receipt.contractor_id,
            amount = %receipt.amount,
            "Job paid"
        );
        Ok(receipt)
    }

    /// The job with `job_id` if it is payable by `client_id`.
    async fn payable_job(
        &self,
        job_id: JobId,
        client_id: ProfileId,
    ) -> Result<Option<(Job, Contract)>> {
        let Some(job) = self.store.job(job_id).await? else {
            return Ok(None);
        };
        if job.is_paid() {
            return Ok(None);
        }
        let contract = self.store.contract(job.contract_id).await?.ok_or_else(|| {
            integrity_failure(format!(
                "job {} references missing contract {}",
                job.id, job.contract_id
            ))
        })?;
        if !contract.is_active() || contract.client_id != client_id {
            return Ok(None);
        }
        Ok(Some((job, contract)))
    }
}

pub(crate) fn integrity_failure(message: String) -> LedgerError {
    tracing::error!(%message, "Ledger data integrity violation");
    LedgerError::DataIntegrity(message)
}
