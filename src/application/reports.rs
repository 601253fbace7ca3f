use super::payments::integrity_failure;
use super::service::LedgerService;
use crate::domain::contract::Contract;
use crate::domain::job::Job;
use crate::domain::money::Balance;
use crate::domain::profile::Profile;
use crate::domain::{ContractId, ProfileId};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// An inclusive time window over payment dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(LedgerError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// A payable job together with the contract it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnpaidJob {
    #[serde(flatten)]
    pub job: Job,
    pub contract: Contract,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionEarnings {
    pub profession: String,
    pub earned: Balance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSpend {
    pub id: ProfileId,
    pub full_name: String,
    pub paid: Balance,
}

impl LedgerService {
    /// A contract the caller is party to, on the caller's own side.
    pub async fn contract(&self, caller: &Profile, contract_id: ContractId) -> Result<Contract> {
        self.store
            .contract(contract_id)
            .await?
            .filter(|c| own_side(caller, c))
            .ok_or(LedgerError::ContractNotFound(contract_id))
    }

    /// The caller's contracts that are not terminated.
    pub async fn contracts(&self, caller: &Profile) -> Result<Vec<Contract>> {
        let mut contracts: Vec<_> = self
            .store
            .contracts()
            .await?
            .into_iter()
            .filter(|c| own_side(caller, c) && !c.is_terminated())
            .collect();
        contracts.sort_by_key(|c| c.id);
        Ok(contracts)
    }

    /// Unpaid jobs of the caller's in-progress contracts.
    pub async fn unpaid_jobs(&self, caller: &Profile) -> Result<Vec<UnpaidJob>> {
        let contracts: HashMap<ContractId, Contract> = self
            .store
            .contracts()
            .await?
            .into_iter()
            .filter(|c| own_side(caller, c) && c.is_active())
            .map(|c| (c.id, c))
            .collect();

        let mut jobs: Vec<_> = self
            .store
            .jobs()
            .await?
            .into_iter()
            .filter(|j| !j.is_paid())
            .filter_map(|job| {
                let contract = contracts.get(&job.contract_id)?.clone();
                Some(UnpaidJob { job, contract })
            })
            .collect();
        jobs.sort_by_key(|u| u.job.id);
        Ok(jobs)
    }

    /// The contractor profession that earned the most within the range.
    pub async fn best_profession(&self, range: DateRange) -> Result<ProfessionEarnings> {
        let mut earnings: BTreeMap<String, Balance> = BTreeMap::new();
        for (job, contract) in self.paid_within(range).await? {
            let contractor = self.party(contract.contractor_id, &contract).await?;
            let earned = earnings.entry(contractor.profession).or_default();
            *earned = earned
                .checked_add(job.price)
                .ok_or_else(|| integrity_failure("profession earnings out of range".into()))?;
        }

        // BTreeMap iterates by name, so `max_by` keeps the last of equals;
        // reverse to prefer the alphabetically first profession on ties.
        earnings
            .into_iter()
            .rev()
            .max_by(|a, b| a.1.cmp(&b.1))
            .map(|(profession, earned)| ProfessionEarnings { profession, earned })
            .ok_or(LedgerError::NoPaidJobs {
                start: range.start,
                end: range.end,
            })
    }

    /// Clients ranked by what they paid within the range, highest first.
    pub async fn best_clients(
        &self,
        range: DateRange,
        limit: Option<usize>,
    ) -> Result<Vec<ClientSpend>> {
        let mut spend: HashMap<ProfileId, (Profile, Balance)> = HashMap::new();
        for (job, contract) in self.paid_within(range).await? {
            if let Some((_, paid)) = spend.get_mut(&contract.client_id) {
                *paid = paid.checked_add(job.price).ok_or_else(|| {
                    integrity_failure(format!(
                        "spend of client {} out of range",
                        contract.client_id
                    ))
                })?;
                continue;
            }
            let client = self.party(contract.client_id, &contract).await?;
            spend.insert(client.id, (client, job.price));
        }

        let mut ranked: Vec<_> = spend
            .into_values()
            .map(|(client, paid)| ClientSpend {
                id: client.id,
                full_name: client.full_name(),
                paid,
            })
            .collect();
        ranked.sort_by(|a, b| b.paid.cmp(&a.paid).then(a.id.cmp(&b.id)));
        ranked.truncate(limit.unwrap_or(self.best_clients_limit));
        Ok(ranked)
    }

    async fn paid_within(&self, range: DateRange) -> Result<Vec<(Job, Contract)>> {
        let contracts: HashMap<ContractId, Contract> = self
            .store
            .contracts()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut paid = Vec::new();
        for job in self.store.jobs().await? {
            let Some(at) = job.paid_at() else { continue };
            if !range.contains(at) {
                continue;
            }
            let contract = contracts.get(&job.contract_id).cloned().ok_or_else(|| {
                integrity_failure(format!(
                    "job {} references missing contract {}",
                    job.id, job.contract_id
                ))
            })?;
            paid.push((job, contract));
        }
        Ok(paid)
    }

    async fn party(&self, profile_id: ProfileId, contract: &Contract) -> Result<Profile> {
        self.store.profile(profile_id).await?.ok_or_else(|| {
            integrity_failure(format!(
                "contract {} references missing profile {}",
                contract.id, profile_id
            ))
        })
    }
}

fn own_side(caller: &Profile, contract: &Contract) -> bool {
    if caller.is_client() {
        contract.client_id == caller.id
    } else {
        contract.contractor_id == caller.id
    }
}
