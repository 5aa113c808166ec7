use thiserror::Error;

use super::account::{AccountBalance, AccountId, Hbar};
use super::client::Client;

/// Errors that can occur while executing a query
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Account ID not set on query")]
    AccountIdNotSet,

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
}

/// Reads an account's current balance from the network
///
/// Uncached: every execution re-queries the network.
#[derive(Debug, Clone, Default)]
pub struct AccountBalanceQuery {
    account_id: Option<AccountId>,
}

impl AccountBalanceQuery {
    /// Creates an empty balance query
    pub fn new() -> Self {
        AccountBalanceQuery::default()
    }

    /// Sets the account to query
    pub fn set_account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Executes the query and returns the account's balance
    pub fn execute(&self, client: &Client) -> Result<AccountBalance, QueryError> {
        let account_id = self.account_id.ok_or(QueryError::AccountIdNotSet)?;

        let hbars = client
            .network()
            .balance(account_id)
            .ok_or(QueryError::AccountNotFound(account_id))?;

        Ok(AccountBalance { account_id, hbars })
    }

    /// Asks the network what this query would cost, without executing it
    pub fn get_cost(&self, client: &Client) -> Result<Hbar, QueryError> {
        self.account_id.ok_or(QueryError::AccountIdNotSet)?;
        Ok(client.network().query_cost())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_without_account_id_fails() {
        let client = Client::for_testnet();
        let query = AccountBalanceQuery::new();

        assert!(matches!(
            query.execute(&client),
            Err(QueryError::AccountIdNotSet)
        ));
        assert!(matches!(
            query.get_cost(&client),
            Err(QueryError::AccountIdNotSet)
        ));
    }

    #[test]
    fn test_query_reports_the_account_it_read() {
        let client = Client::for_testnet();
        let account_id = AccountId::new(0, 0, 2);

        let balance = AccountBalanceQuery::new()
            .set_account_id(account_id)
            .execute(&client)
            .unwrap();

        assert_eq!(balance.account_id, account_id);
        assert!(balance.hbars.is_non_negative());
    }

    #[test]
    fn test_query_for_unknown_account_fails() {
        let client = Client::for_testnet();
        let query = AccountBalanceQuery::new().set_account_id(AccountId::new(0, 0, 50_000));

        assert!(matches!(
            query.execute(&client),
            Err(QueryError::AccountNotFound(_))
        ));
    }
}
