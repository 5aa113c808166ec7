use sha2::{Digest, Sha256};
use thiserror::Error;

use std::sync::Arc;

use super::account::AccountId;
use super::crypto::PrivateKey;
use super::network::LedgerNetwork;
use super::transaction::{
    SignedTransaction, Status, TransactionBody, TransactionData, TransactionError, TransactionId,
    TransactionReceipt, TransactionResponse,
};

/// Errors that can occur while submitting work through a client handle
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("No operator configured on this client")]
    NoOperator,

    #[error("No receipt found for transaction: {0}")]
    ReceiptNotFound(String),

    #[error("Transaction failed with status: {status}")]
    ReceiptStatus { status: Status },

    #[error("Transaction error: {0}")]
    TransactionError(#[from] TransactionError),
}

/// The identity that signs and pays for everything a client submits
#[derive(Debug, Clone)]
struct Operator {
    account_id: AccountId,
    private_key: PrivateKey,
}

/// A handle bound to one ledger network and one operator identity
///
/// Create once, use for the life of the process. The operator is not
/// validated against the network at bind time; a bad identity surfaces as a
/// rejected receipt when something is submitted.
#[derive(Debug, Clone)]
pub struct Client {
    network: Arc<LedgerNetwork>,
    operator: Option<Operator>,
}

impl Client {
    /// Creates a client bound to an in-process test network
    pub fn for_testnet() -> Self {
        Client::for_network(LedgerNetwork::new())
    }

    /// Creates a client bound to an explicit network backend
    pub fn for_network(network: LedgerNetwork) -> Self {
        Client {
            network: Arc::new(network),
            operator: None,
        }
    }

    /// Sets the account that signs and pays for subsequent operations
    pub fn set_operator(&mut self, account_id: AccountId, private_key: PrivateKey) {
        self.operator = Some(Operator {
            account_id,
            private_key,
        });
    }

    /// The configured operator account, if any
    pub fn operator_account_id(&self) -> Option<AccountId> {
        self.operator.as_ref().map(|o| o.account_id)
    }

    pub(crate) fn network(&self) -> &LedgerNetwork {
        &self.network
    }

    /// Signs a transaction body with the operator key and submits it,
    /// blocking until the network acknowledges
    pub(crate) fn execute_transaction(
        &self,
        data: TransactionData,
    ) -> Result<TransactionResponse, OperationError> {
        let operator = self.operator.as_ref().ok_or(OperationError::NoOperator)?;

        let body = TransactionBody {
            transaction_id: TransactionId::generate(),
            data,
        };

        let body_bytes = body.to_signing_bytes()?;
        let signature = operator.private_key.sign(&body_bytes);
        let transaction_hash = hex::encode(Sha256::digest(&body_bytes));
        let transaction_id = body.transaction_id.clone();

        self.network.submit(SignedTransaction {
            body,
            payer: operator.account_id,
            payer_key: operator.private_key.public_key(),
            signature,
        });

        Ok(TransactionResponse {
            transaction_id,
            transaction_hash,
        })
    }

    pub(crate) fn receipt(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReceipt, OperationError> {
        self.network
            .receipt(&transaction_id.id)
            .ok_or_else(|| OperationError::ReceiptNotFound(transaction_id.id.clone()))
    }
}
