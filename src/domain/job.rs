use super::money::Balance;
use super::{ContractId, JobId};
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a job has been paid. The timestamp only exists on `Paid`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PaymentState {
    #[default]
    Unpaid,
    Paid { paid_at: DateTime<Utc> },
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Job {
    pub id: JobId,
    pub contract_id: ContractId,
    #[serde(default)]
    pub description: String,
    pub price: Balance,
    #[serde(default)]
    pub payment: PaymentState,
}

impl Job {
    pub fn new(id: JobId, contract_id: ContractId, price: Balance) -> Self {
        Self {
            id,
            contract_id,
            description: String::new(),
            price,
            payment: PaymentState::Unpaid,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self.payment, PaymentState::Paid { .. })
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        match self.payment {
            PaymentState::Paid { paid_at } => Some(paid_at),
            PaymentState::Unpaid => None,
        }
    }

    /// Marks the job paid. A job is paid at most once.
    pub fn mark_paid(&mut self, paid_at: DateTime<Utc>) -> Result<(), LedgerError> {
        if self.is_paid() {
            return Err(LedgerError::DataIntegrity(format!(
                "job {} is already paid",
                self.id
            )));
        }
        self.payment = PaymentState::Paid { paid_at };
        Ok(())
    }

    /// Whether replacing `self` with `next` respects the payment lifecycle.
    pub fn can_become(&self, next: &Job) -> bool {
        match (self.payment, next.payment) {
            (PaymentState::Unpaid, _) => true,
            (PaymentState::Paid { .. }, PaymentState::Unpaid) => false,
            (PaymentState::Paid { paid_at }, PaymentState::Paid { paid_at: next_at }) => {
                paid_at == next_at
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mark_paid_once() {
        let mut job = Job::new(1, 1, Balance::new(dec!(200)));
        assert!(!job.is_paid());
        assert_eq!(job.paid_at(), None);

        let now = Utc::now();
        job.mark_paid(now).unwrap();
        assert!(job.is_paid());
        assert_eq!(job.paid_at(), Some(now));

        assert!(matches!(
            job.mark_paid(Utc::now()),
            Err(LedgerError::DataIntegrity(_))
        ));
        assert_eq!(job.paid_at(), Some(now));
    }

    #[test]
    fn test_payment_never_reverses() {
        let unpaid = Job::new(1, 1, Balance::new(dec!(10)));
        let mut paid = unpaid.clone();
        paid.mark_paid(Utc::now()).unwrap();

        assert!(unpaid.can_become(&paid));
        assert!(paid.can_become(&paid));
        assert!(!paid.can_become(&unpaid));
    }

    #[test]
    fn test_payment_state_serialization() {
        let job = Job::new(2, 1, Balance::new(dec!(201)));
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["payment"]["status"], "unpaid");
        assert!(json["payment"].get("paid_at").is_none());

        let raw = r#"{"id": 3, "contract_id": 1, "price": "121",
            "payment": {"status": "paid", "paid_at": "2020-08-15T19:11:26Z"}}"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert!(job.is_paid());
        assert_eq!(job.price, Balance::new(dec!(121)));
    }

    #[test]
    fn test_payment_defaults_to_unpaid() {
        let raw = r#"{"id": 4, "contract_id": 2, "price": "200"}"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(job.payment, PaymentState::Unpaid);
        assert_eq!(job.description, "");
    }
}
