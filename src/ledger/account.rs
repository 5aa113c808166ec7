use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Number of tinybars in one hbar
pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

/// Errors that can occur when parsing an account identifier
#[derive(Debug, Error)]
pub enum ParseAccountIdError {
    #[error("Expected shard.realm.num, got: {0}")]
    InvalidFormat(String),

    #[error("Invalid account number segment: {0}")]
    InvalidSegment(String),
}

/// Identifies an account on the ledger as a shard.realm.num triple
///
/// Assigned by the network on account creation and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId {
    /// The shard the account lives on
    pub shard: u64,

    /// The realm within the shard
    pub realm: u64,

    /// The account number within the realm
    pub num: u64,
}

impl AccountId {
    /// Creates a new account identifier
    ///
    /// # Arguments
    ///
    /// * `shard` - The shard number
    /// * `realm` - The realm number
    /// * `num` - The account number
    ///
    /// # Returns
    ///
    /// A new AccountId instance
    pub fn new(shard: u64, realm: u64, num: u64) -> Self {
        AccountId { shard, realm, num }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for AccountId {
    type Err = ParseAccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').collect();
        if segments.len() != 3 {
            return Err(ParseAccountIdError::InvalidFormat(s.to_string()));
        }

        let parse = |segment: &str| {
            segment
                .parse::<u64>()
                .map_err(|_| ParseAccountIdError::InvalidSegment(segment.to_string()))
        };

        Ok(AccountId {
            shard: parse(segments[0])?,
            realm: parse(segments[1])?,
            num: parse(segments[2])?,
        })
    }
}

/// A signed amount of the ledger's native currency, stored in tinybars
///
/// Negative amounts represent debits in a transfer list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hbar(i64);

impl Hbar {
    /// Zero tinybars
    pub const ZERO: Hbar = Hbar(0);

    /// Creates an amount from a tinybar count
    pub fn from_tinybars(tinybars: i64) -> Self {
        Hbar(tinybars)
    }

    /// Creates an amount from whole hbars
    pub fn from_hbars(hbars: i64) -> Self {
        Hbar(hbars * TINYBARS_PER_HBAR)
    }

    /// The amount as tinybars
    pub fn as_tinybars(&self) -> i64 {
        self.0
    }

    /// Adds two amounts, failing on overflow
    pub fn checked_add(&self, other: Hbar) -> Option<Hbar> {
        self.0.checked_add(other.0).map(Hbar)
    }

    /// Whether the amount is zero or positive
    pub fn is_non_negative(&self) -> bool {
        self.0 >= 0
    }
}

impl Neg for Hbar {
    type Output = Hbar;

    fn neg(self) -> Self::Output {
        Hbar(-self.0)
    }
}

impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tℏ", self.0)
    }
}

/// The balance of an account as reported by the network
#[derive(Debug, Clone)]
pub struct AccountBalance {
    /// The queried account
    pub account_id: AccountId,

    /// The account's current balance
    pub hbars: Hbar,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_parsing() {
        let id: AccountId = "0.0.1234".parse().unwrap();
        assert_eq!(id, AccountId::new(0, 0, 1234));
        assert_eq!(id.to_string(), "0.0.1234");
    }

    #[test]
    fn test_account_id_rejects_malformed_input() {
        assert!("0.0".parse::<AccountId>().is_err());
        assert!("0.0.12.34".parse::<AccountId>().is_err());
        assert!("0.0.abc".parse::<AccountId>().is_err());
        assert!("".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_hbar_default_is_zero() {
        assert_eq!(Hbar::default(), Hbar::ZERO);
    }

    #[test]
    fn test_hbar_conversion() {
        assert_eq!(Hbar::from_hbars(1).as_tinybars(), 100_000_000);
        assert_eq!(Hbar::from_tinybars(50).as_tinybars(), 50);
    }

    #[test]
    fn test_hbar_negation_and_addition() {
        let amount = Hbar::from_tinybars(10_000);
        let sum = amount.checked_add(-amount).unwrap();
        assert_eq!(sum, Hbar::ZERO);
    }

    #[test]
    fn test_hbar_overflow_is_detected() {
        let max = Hbar::from_tinybars(i64::MAX);
        assert!(max.checked_add(Hbar::from_tinybars(1)).is_none());
    }
}
