use super::locks::RowKey;
use super::payments::integrity_failure;
use super::service::LedgerService;
use crate::domain::money::{Amount, Balance};
use crate::domain::ports::LedgerBatch;
use crate::domain::profile::Profile;
use crate::domain::ProfileId;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

/// A deposit may be at most `1 / DEPOSIT_CEILING_DIVISOR` of the unpaid total.
pub const DEPOSIT_CEILING_DIVISOR: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositReceipt {
    pub client_id: ProfileId,
    pub amount: Amount,
    pub balance: Balance,
}

impl LedgerService {
    /// Adds funds to a client's balance, capped at a quarter of what the
    /// client currently owes on unpaid jobs of in-progress contracts.
    ///
    /// The client row stays locked from the unpaid-total read to the balance
    /// write. Paying any of the client's jobs needs the same lock, so the
    /// total cannot change underneath the check.
    pub async fn deposit(&self, client_id: ProfileId, amount: Decimal) -> Result<DepositReceipt> {
        let amount = Amount::try_from(amount)?;

        let _guard = self.locks.lock(RowKey::Profile(client_id)).await;

        let mut client = self
            .store
            .profile(client_id)
            .await?
            .filter(Profile::is_client)
            .ok_or(LedgerError::InvalidClient(client_id))?;

        let unpaid = self.unpaid_total(client_id).await?;
        let divisor = Decimal::from(DEPOSIT_CEILING_DIVISOR);
        let over_limit = amount
            .value()
            .checked_mul(divisor)
            .is_none_or(|scaled| scaled > unpaid.0);
        if over_limit {
            let limit = Balance::new(unpaid.0 / divisor);
            tracing::debug!(client_id, %amount, %limit, "Deposit over limit");
            return Err(LedgerError::DepositExceedsLimit { amount, limit });
        }

        client.credit(amount.into()).inspect_err(|e| {
            tracing::error!(error = %e, client_id, "Client balance out of range");
        })?;
        let receipt = DepositReceipt {
            client_id,
            amount,
            balance: client.balance,
        };
        self.commit(LedgerBatch::default().with_profile(client)).await?;

        tracing::info!(client_id, %amount, balance = %receipt.balance, "Deposit applied");
        Ok(receipt)
    }

    /// Same as `deposit`, for an amount still in its textual form.
    pub async fn deposit_str(&self, client_id: ProfileId, amount: &str) -> Result<DepositReceipt> {
        let amount: Amount = amount.parse()?;
        self.deposit(client_id, amount.value()).await
    }

    /// Sum of prices of the client's payable jobs.
    pub(crate) async fn unpaid_total(&self, client_id: ProfileId) -> Result<Balance> {
        let active: HashSet<_> = self
            .store
            .contracts()
            .await?
            .into_iter()
            .filter(|c| c.is_active() && c.client_id == client_id)
            .map(|c| c.id)
            .collect();

        let prices = self
            .store
            .jobs()
            .await?
            .into_iter()
            .filter(|j| !j.is_paid() && active.contains(&j.contract_id))
            .map(|j| j.price);
        Balance::checked_sum(prices).ok_or_else(|| {
            integrity_failure(format!("unpaid total of client {} is out of range", client_id))
        })
    }
}
