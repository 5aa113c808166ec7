// Ledger module
//
// This module contains the client-side ledger workflow including:
// - Account identifiers and amounts
// - Key pairs and signatures
// - Transaction builders and receipts
// - Balance and cost queries
// - The client handle
// - The in-process test network

pub mod account;
pub mod client;
pub mod crypto;
pub mod network;
pub mod query;
pub mod transaction;

// Re-export main components for easier access
pub use account::{AccountBalance, AccountId, Hbar};
pub use client::{Client, OperationError};
pub use crypto::PrivateKey;
pub use query::AccountBalanceQuery;
pub use transaction::{AccountCreateTransaction, TransactionReceipt, TransferTransaction};
