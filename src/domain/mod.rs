//! Ledger entities, money value objects and the storage port.

pub mod contract;
pub mod job;
pub mod money;
pub mod ports;
pub mod profile;
pub mod snapshot;

pub type ProfileId = u32;
pub type ContractId = u32;
pub type JobId = u32;
