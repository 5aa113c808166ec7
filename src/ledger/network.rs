use dashmap::DashMap;
use log::{info, warn};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::account::{AccountId, Hbar, TINYBARS_PER_HBAR};
use super::crypto::{verify_signature, PublicKey};
use super::transaction::{
    SignedTransaction, Status, TransactionData, TransactionReceipt, Transfer,
};

/// Account numbers below this are faucet accounts the test network pre-funds
const GENESIS_ACCOUNT_CEILING: u64 = 1000;

/// Balance a faucet account starts with
const GENESIS_BALANCE_TINYBARS: i64 = 100 * TINYBARS_PER_HBAR;

/// Fee the network meters for a balance query
const QUERY_COST_TINYBARS: i64 = 25;

/// An account record as the network holds it
#[derive(Debug, Clone)]
struct LedgerAccount {
    balance: Hbar,
    /// None for faucet accounts until their key is first seen
    key: Option<PublicKey>,
}

/// An in-process test ledger: orders submissions, enforces conservation and
/// funds, and issues receipts
///
/// Stands in for the remote network; a client handle routes everything it
/// submits through one of these.
#[derive(Debug)]
pub struct LedgerNetwork {
    accounts: DashMap<AccountId, LedgerAccount>,
    receipts: DashMap<String, TransactionReceipt>,
    next_account_num: AtomicU64,
}

impl LedgerNetwork {
    /// Creates an empty test network
    ///
    /// Faucet accounts (numbers below 1000) materialize pre-funded on first
    /// use, so any low-numbered operator id from configuration can pay.
    pub fn new() -> Self {
        LedgerNetwork {
            accounts: DashMap::new(),
            receipts: DashMap::new(),
            next_account_num: AtomicU64::new(GENESIS_ACCOUNT_CEILING),
        }
    }

    /// Submits a signed transaction and blocks until a receipt is available
    ///
    /// On any validation failure the receipt carries the failing status and
    /// nothing is applied to the ledger.
    pub fn submit(&self, transaction: SignedTransaction) -> TransactionReceipt {
        let transaction_id = transaction.body.transaction_id.id.clone();
        let receipt = self.process(&transaction);

        if receipt.status.is_success() {
            info!(
                "Transaction {} reached consensus: {}",
                transaction_id, receipt.status
            );
        } else {
            warn!(
                "Transaction {} rejected: {}",
                transaction_id, receipt.status
            );
        }

        self.receipts.insert(transaction_id, receipt.clone());
        receipt
    }

    /// Looks up the receipt for a previously submitted transaction
    pub fn receipt(&self, transaction_id: &str) -> Option<TransactionReceipt> {
        self.receipts.get(transaction_id).map(|r| r.clone())
    }

    /// Reads an account's current balance
    pub fn balance(&self, account_id: AccountId) -> Option<Hbar> {
        self.materialize_genesis(account_id);
        self.accounts.get(&account_id).map(|a| a.balance)
    }

    /// The fee the network would charge for a balance query
    pub fn query_cost(&self) -> Hbar {
        Hbar::from_tinybars(QUERY_COST_TINYBARS)
    }

    fn process(&self, transaction: &SignedTransaction) -> TransactionReceipt {
        let body_bytes = match transaction.body.to_signing_bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("Could not reconstruct signing bytes: {}", err);
                return Self::rejected(Status::InvalidSignature);
            }
        };

        let payer = transaction.payer;
        self.materialize_genesis(payer);

        if !self.accounts.contains_key(&payer) {
            return Self::rejected(Status::InvalidAccountId);
        }

        // The payer's stored key must match the submitted one; faucet
        // accounts adopt their key on first valid use.
        if let Some(account) = self.accounts.get(&payer) {
            if let Some(key) = account.key {
                if key != transaction.payer_key {
                    return Self::rejected(Status::InvalidSignature);
                }
            }
        }

        match verify_signature(&body_bytes, &transaction.signature, &transaction.payer_key) {
            Ok(true) => {}
            _ => return Self::rejected(Status::InvalidSignature),
        }

        if let Some(mut account) = self.accounts.get_mut(&payer) {
            account.key.get_or_insert(transaction.payer_key);
        }

        match &transaction.body.data {
            TransactionData::AccountCreate {
                key,
                initial_balance,
            } => self.apply_account_create(payer, *key, *initial_balance),
            TransactionData::Transfer { transfers } => self.apply_transfer(transfers),
        }
    }

    fn apply_account_create(
        &self,
        payer: AccountId,
        key: PublicKey,
        initial_balance: Hbar,
    ) -> TransactionReceipt {
        if !initial_balance.is_non_negative() {
            return Self::rejected(Status::InvalidInitialBalance);
        }

        {
            let mut payer_account = match self.accounts.get_mut(&payer) {
                Some(account) => account,
                None => return Self::rejected(Status::InvalidAccountId),
            };

            if payer_account.balance < initial_balance {
                return Self::rejected(Status::InsufficientAccountBalance);
            }

            payer_account.balance = Hbar::from_tinybars(
                payer_account.balance.as_tinybars() - initial_balance.as_tinybars(),
            );
        }

        // Never reused within a session
        let num = self.next_account_num.fetch_add(1, Ordering::SeqCst);
        let account_id = AccountId::new(0, 0, num);

        self.accounts.insert(
            account_id,
            LedgerAccount {
                balance: initial_balance,
                key: Some(key),
            },
        );

        info!("Created account {}", account_id);

        TransactionReceipt {
            status: Status::Success,
            account_id: Some(account_id),
        }
    }

    fn apply_transfer(&self, transfers: &[Transfer]) -> TransactionReceipt {
        if transfers.is_empty() {
            return Self::rejected(Status::InvalidTransferList);
        }

        // Conservation: the entries must sum to exactly zero.
        let mut sum = Hbar::ZERO;
        for transfer in transfers {
            sum = match sum.checked_add(transfer.amount) {
                Some(sum) => sum,
                None => return Self::rejected(Status::InvalidTransferList),
            };
        }
        if sum != Hbar::ZERO {
            return Self::rejected(Status::InvalidTransferList);
        }

        // Net the entries per account, then validate every account before
        // touching any balance so a failed transfer applies nothing.
        let mut deltas: HashMap<AccountId, i64> = HashMap::new();
        for transfer in transfers {
            let delta = deltas.entry(transfer.account_id).or_insert(0);
            *delta = match delta.checked_add(transfer.amount.as_tinybars()) {
                Some(delta) => delta,
                None => return Self::rejected(Status::InvalidTransferList),
            };
        }

        for (&account_id, &delta) in &deltas {
            self.materialize_genesis(account_id);

            let account = match self.accounts.get(&account_id) {
                Some(account) => account,
                None => return Self::rejected(Status::InvalidAccountId),
            };

            if delta < 0 && account.balance.as_tinybars() + delta < 0 {
                return Self::rejected(Status::InsufficientAccountBalance);
            }
        }

        for (&account_id, &delta) in &deltas {
            if let Some(mut account) = self.accounts.get_mut(&account_id) {
                account.balance = Hbar::from_tinybars(account.balance.as_tinybars() + delta);
            }
        }

        TransactionReceipt {
            status: Status::Success,
            account_id: None,
        }
    }

    fn materialize_genesis(&self, account_id: AccountId) {
        let eligible = account_id.shard == 0
            && account_id.realm == 0
            && account_id.num > 0
            && account_id.num < GENESIS_ACCOUNT_CEILING;

        if eligible {
            self.accounts.entry(account_id).or_insert(LedgerAccount {
                balance: Hbar::from_tinybars(GENESIS_BALANCE_TINYBARS),
                key: None,
            });
        }
    }

    fn rejected(status: Status) -> TransactionReceipt {
        TransactionReceipt {
            status,
            account_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faucet_accounts_materialize_pre_funded() {
        let network = LedgerNetwork::new();
        let operator = AccountId::new(0, 0, 2);

        let balance = network.balance(operator).unwrap();
        assert_eq!(balance.as_tinybars(), GENESIS_BALANCE_TINYBARS);
    }

    #[test]
    fn test_unknown_high_numbered_account_has_no_balance() {
        let network = LedgerNetwork::new();
        assert!(network.balance(AccountId::new(0, 0, 999_999)).is_none());
    }

    #[test]
    fn test_query_cost_is_non_negative() {
        let network = LedgerNetwork::new();
        assert!(network.query_cost().is_non_negative());
    }
}
