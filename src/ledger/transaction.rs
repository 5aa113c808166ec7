use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use std::fmt;

use super::account::{AccountId, Hbar};
use super::client::{Client, OperationError};
use super::crypto::{CryptoError, PublicKey, TransactionSignature};

/// Errors that can occur while building or executing a transaction
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Account key not set")]
    MissingAccountKey,

    #[error("Transfer list is empty")]
    EmptyTransferList,

    #[error("Crypto error: {0}")]
    CryptoError(#[from] CryptoError),

    #[error("System error: {0}")]
    SystemError(String),
}

/// The final consensus status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    InvalidSignature,
    InvalidAccountId,
    InsufficientAccountBalance,
    InvalidTransferList,
    InvalidInitialBalance,
}

impl Status {
    /// Whether the transaction reached consensus successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Success => "SUCCESS",
            Status::InvalidSignature => "INVALID_SIGNATURE",
            Status::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Status::InsufficientAccountBalance => "INSUFFICIENT_ACCOUNT_BALANCE",
            Status::InvalidTransferList => "INVALID_TRANSFER_LIST",
            Status::InvalidInitialBalance => "INVALID_INITIAL_BALANCE",
        };
        write!(f, "{}", name)
    }
}

/// One entry in a transfer list: a debit (negative) or credit (positive)
#[derive(Debug, Clone, Serialize)]
pub struct Transfer {
    /// The account being debited or credited
    pub account_id: AccountId,

    /// The signed amount applied to the account
    pub amount: Hbar,
}

/// The operation-specific payload of a transaction body
#[derive(Debug, Clone, Serialize)]
pub enum TransactionData {
    /// Create a new account guarded by `key`, funded by the payer
    AccountCreate {
        key: PublicKey,
        initial_balance: Hbar,
    },

    /// Move value between accounts; entries must sum to zero
    Transfer { transfers: Vec<Transfer> },
}

/// Identifies a transaction within a session
#[derive(Debug, Clone, Serialize)]
pub struct TransactionId {
    /// Unique identifier for the transaction
    pub id: String,

    /// When the transaction was submitted for consensus
    pub valid_start: DateTime<Utc>,
}

impl TransactionId {
    /// Generates a fresh transaction identifier
    pub fn generate() -> Self {
        TransactionId {
            id: Uuid::new_v4().to_string(),
            valid_start: Utc::now(),
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.valid_start.timestamp())
    }
}

/// The signed portion of a transaction
#[derive(Debug, Clone, Serialize)]
pub struct TransactionBody {
    /// The transaction's identifier
    pub transaction_id: TransactionId,

    /// The operation payload
    pub data: TransactionData,
}

impl TransactionBody {
    /// Canonical bytes of the body, used for signing and hashing
    pub fn to_signing_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        serde_json::to_vec(self).map_err(|e| TransactionError::SystemError(e.to_string()))
    }
}

/// A transaction body together with the payer's authorization
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// The signed body
    pub body: TransactionBody,

    /// The account paying for the transaction
    pub payer: AccountId,

    /// The payer's public key
    pub payer_key: PublicKey,

    /// The payer's signature over the body bytes
    pub signature: TransactionSignature,
}

/// The network's acknowledgement of a submitted transaction
#[derive(Debug, Clone)]
pub struct TransactionResponse {
    /// The submitted transaction's identifier
    pub transaction_id: TransactionId,

    /// Hex-encoded hash of the signed body
    pub transaction_hash: String,
}

impl TransactionResponse {
    /// Retrieves the consensus receipt for this transaction
    ///
    /// Blocks until the network has a receipt; with the in-process backend
    /// the receipt is available as soon as submission returns.
    pub fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt, OperationError> {
        client.receipt(&self.transaction_id)
    }
}

/// The network's confirmation record for a transaction after consensus
#[derive(Debug, Clone)]
pub struct TransactionReceipt {
    /// The final status of the transaction
    pub status: Status,

    /// The account created by the transaction, if any
    pub account_id: Option<AccountId>,
}

/// Builds a balanced value transfer between accounts
///
/// The network rejects the whole transaction if the entries do not sum to
/// zero, so nothing is applied on failure.
#[derive(Debug, Clone, Default)]
pub struct TransferTransaction {
    transfers: Vec<Transfer>,
}

impl TransferTransaction {
    /// Creates an empty transfer transaction
    pub fn new() -> Self {
        TransferTransaction::default()
    }

    /// Appends a debit or credit entry to the transfer list
    pub fn add_hbar_transfer(mut self, account_id: AccountId, amount: Hbar) -> Self {
        self.transfers.push(Transfer { account_id, amount });
        self
    }

    /// The entries accumulated so far
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Signs the transfer with the client's operator and submits it
    pub fn execute(self, client: &Client) -> Result<TransactionResponse, OperationError> {
        if self.transfers.is_empty() {
            return Err(TransactionError::EmptyTransferList.into());
        }

        client.execute_transaction(TransactionData::Transfer {
            transfers: self.transfers,
        })
    }
}

/// Builds an account-creation request
#[derive(Debug, Clone, Default)]
pub struct AccountCreateTransaction {
    key: Option<PublicKey>,
    initial_balance: Hbar,
}

impl AccountCreateTransaction {
    /// Creates an account-creation transaction with a zero initial balance
    pub fn new() -> Self {
        AccountCreateTransaction::default()
    }

    /// Sets the public key that will guard the new account
    pub fn set_key(mut self, key: PublicKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets the initial balance, funded by the operator
    pub fn set_initial_balance(mut self, balance: Hbar) -> Self {
        self.initial_balance = balance;
        self
    }

    /// Signs the request with the client's operator and submits it
    pub fn execute(self, client: &Client) -> Result<TransactionResponse, OperationError> {
        let key = self.key.ok_or(TransactionError::MissingAccountKey)?;

        client.execute_transaction(TransactionData::AccountCreate {
            key,
            initial_balance: self.initial_balance,
        })
    }
}
