use super::{ContractId, ProfileId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    New,
    InProgress,
    Terminated,
}

/// Binds one client to one contractor. Jobs hang off a contract.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Contract {
    pub id: ContractId,
    #[serde(default)]
    pub terms: String,
    pub status: ContractStatus,
    pub client_id: ProfileId,
    pub contractor_id: ProfileId,
}

impl Contract {
    pub fn new(
        id: ContractId,
        client_id: ProfileId,
        contractor_id: ProfileId,
        status: ContractStatus,
    ) -> Self {
        Self {
            id,
            terms: String::new(),
            status,
            client_id,
            contractor_id,
        }
    }

    /// Only jobs of in-progress contracts can be paid.
    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::InProgress
    }

    pub fn is_terminated(&self) -> bool {
        self.status == ContractStatus::Terminated
    }

    pub fn involves(&self, profile_id: ProfileId) -> bool {
        self.client_id == profile_id || self.contractor_id == profile_id
    }
}
