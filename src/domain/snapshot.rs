use super::contract::Contract;
use super::job::Job;
use super::profile::{Profile, Role};
use super::ProfileId;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The full contents of a ledger, as seeded from a file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl LedgerSnapshot {
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn with_contract(mut self, contract: Contract) -> Self {
        self.contracts.push(contract);
        self
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    /// Checks referential integrity and the non-negative money rules.
    pub fn validate(&self) -> Result<()> {
        let mut roles: HashMap<ProfileId, Role> = HashMap::new();
        for profile in &self.profiles {
            if profile.balance.is_negative() {
                return Err(integrity(format!(
                    "profile {} has a negative balance",
                    profile.id
                )));
            }
            if roles.insert(profile.id, profile.role).is_some() {
                return Err(integrity(format!("duplicate profile id {}", profile.id)));
            }
        }

        let mut contracts = HashSet::new();
        for contract in &self.contracts {
            if !contracts.insert(contract.id) {
                return Err(integrity(format!("duplicate contract id {}", contract.id)));
            }
            check_role(&roles, contract, contract.client_id, Role::Client)?;
            check_role(&roles, contract, contract.contractor_id, Role::Contractor)?;
        }

        let mut jobs = HashSet::new();
        for job in &self.jobs {
            if !jobs.insert(job.id) {
                return Err(integrity(format!("duplicate job id {}", job.id)));
            }
            if job.price.is_negative() {
                return Err(integrity(format!("job {} has a negative price", job.id)));
            }
            if !contracts.contains(&job.contract_id) {
                return Err(integrity(format!(
                    "job {} references missing contract {}",
                    job.id, job.contract_id
                )));
            }
        }

        Ok(())
    }
}

fn check_role(
    roles: &HashMap<ProfileId, Role>,
    contract: &Contract,
    profile_id: ProfileId,
    expected: Role,
) -> Result<()> {
    match roles.get(&profile_id) {
        Some(role) if *role == expected => Ok(()),
        Some(_) => Err(integrity(format!(
            "contract {} references profile {} with the wrong role",
            contract.id, profile_id
        ))),
        None => Err(integrity(format!(
            "contract {} references missing profile {}",
            contract.id, profile_id
        ))),
    }
}

fn integrity(message: String) -> LedgerError {
    LedgerError::DataIntegrity(message)
}
