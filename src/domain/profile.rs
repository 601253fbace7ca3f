use super::ProfileId;
use super::money::Balance;
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Contractor,
}

/// A balance holder: either a client paying for jobs or a contractor doing them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Profile {
    pub id: ProfileId,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub role: Role,
    pub balance: Balance,
}

impl Profile {
    pub fn client(id: ProfileId, first_name: &str, last_name: &str, balance: Balance) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            profession: String::new(),
            role: Role::Client,
            balance,
        }
    }

    pub fn contractor(
        id: ProfileId,
        first_name: &str,
        last_name: &str,
        profession: &str,
        balance: Balance,
    ) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            profession: profession.to_string(),
            role: Role::Contractor,
            balance,
        }
    }

    pub fn is_client(&self) -> bool {
        self.role == Role::Client
    }

    pub fn is_contractor(&self) -> bool {
        self.role == Role::Contractor
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Adds funds to the balance. Fails, leaving the balance as it was, when
    /// the sum is out of range.
    pub fn credit(&mut self, amount: Balance) -> Result<(), LedgerError> {
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            LedgerError::DataIntegrity(format!(
                "balance {} of profile {} cannot take {} more",
                self.balance, self.id, amount
            ))
        })?;
        Ok(())
    }

    /// Removes funds if the balance covers them; the balance never goes negative.
    pub fn debit(&mut self, amount: Balance) -> Result<(), LedgerError> {
        if self.balance >= amount {
            self.balance -= amount;
            Ok(())
        } else {
            Err(LedgerError::InsufficientBalance {
                balance: self.balance,
                price: amount,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_success() {
        let mut client = Profile::client(1, "Harry", "Potter", Balance::new(dec!(500)));
        client.debit(Balance::new(dec!(200))).unwrap();
        assert_eq!(client.balance, Balance::new(dec!(300)));
    }

    #[test]
    fn test_debit_exact_balance() {
        let mut client = Profile::client(1, "Harry", "Potter", Balance::new(dec!(200)));
        client.debit(Balance::new(dec!(200))).unwrap();
        assert_eq!(client.balance, Balance::ZERO);
    }

    #[test]
    fn test_debit_insufficient() {
        let mut client = Profile::client(1, "Harry", "Potter", Balance::new(dec!(100)));
        let result = client.debit(Balance::new(dec!(200)));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(client.balance, Balance::new(dec!(100)));
    }

    #[test]
    fn test_credit() {
        let mut contractor =
            Profile::contractor(5, "Linus", "Torvalds", "Programmer", Balance::new(dec!(64)));
        contractor.credit(Balance::new(dec!(200))).unwrap();
        assert_eq!(contractor.balance, Balance::new(dec!(264)));
        assert!(contractor.is_contractor());
        assert!(!contractor.is_client());
    }

    #[test]
    fn test_credit_overflow() {
        let mut contractor =
            Profile::contractor(5, "Linus", "Torvalds", "Programmer", Balance::new(Decimal::MAX));
        let result = contractor.credit(Balance::new(dec!(1)));
        assert!(matches!(result, Err(LedgerError::DataIntegrity(_))));
        assert_eq!(contractor.balance, Balance::new(Decimal::MAX));
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Contractor).unwrap();
        assert_eq!(json, "\"contractor\"");
        let role: Role = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(role, Role::Client);
    }
}
