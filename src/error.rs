use crate::domain::money::{Amount, Balance};
use crate::domain::{ContractId, JobId, ProfileId};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Caller profile could not be resolved")]
    Unauthenticated,
    #[error("Profile {0} is not a client")]
    NotAuthorized(ProfileId),
    #[error("No payable job {0} found")]
    JobNotFound(JobId),
    #[error("Client balance {balance} does not cover job price {price}")]
    InsufficientBalance { balance: Balance, price: Balance },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Profile {0} is not a valid client")]
    InvalidClient(ProfileId),
    #[error("Deposit of {amount} exceeds the limit of {limit} (25% of unpaid jobs)")]
    DepositExceedsLimit { amount: Amount, limit: Balance },
    #[error("No contract {0} found")]
    ContractNotFound(ContractId),
    #[error("No paid jobs between {start} and {end}")]
    NoPaidJobs {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
    #[error("Transaction failure: {0}")]
    TransactionFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LedgerError {
    /// HTTP status an outer layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            LedgerError::Unauthenticated => 401,
            LedgerError::NotAuthorized(_) => 403,
            LedgerError::JobNotFound(_)
            | LedgerError::InvalidClient(_)
            | LedgerError::ContractNotFound(_)
            | LedgerError::NoPaidJobs { .. } => 404,
            LedgerError::InvalidAmount(_) | LedgerError::InvalidDateRange { .. } => 400,
            LedgerError::InsufficientBalance { .. } | LedgerError::DepositExceedsLimit { .. } => {
                409
            }
            _ => 500,
        }
    }

    /// True for failures that are not caused by caller input.
    pub fn is_unexpected(&self) -> bool {
        self.status_code() >= 500
    }

    /// Reason safe to show to a caller. Internal failures are not described.
    pub fn public_reason(&self) -> String {
        if self.is_unexpected() {
            "internal error".to_string()
        } else {
            self.to_string()
        }
    }

    pub(crate) fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LedgerError::TransactionFailure(Box::new(err))
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        LedgerError::storage(err)
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
