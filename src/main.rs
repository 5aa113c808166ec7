use anyhow::Result;
use log::info;

mod config;
mod ledger;

use config::OperatorConfig;
use ledger::query::QueryError;
use ledger::{
    AccountBalance, AccountBalanceQuery, AccountCreateTransaction, AccountId, Client, Hbar,
    OperationError, PrivateKey, TransactionReceipt, TransferTransaction,
};

/// Initial balance for accounts provisioned by this demo, in tinybars
const INITIAL_BALANCE_TINYBARS: i64 = 1000;

/// Amount moved from the operator to the new account, in tinybars
const TRANSFER_TINYBARS: i64 = 10_000;

// Generate a key pair, submit an account-creation request and block for the
// receipt. The fresh private key is returned alongside the identifier so the
// caller can record it; it exists nowhere else.
fn create_new_account(client: &Client) -> Result<(AccountId, PrivateKey), OperationError> {
    let new_account_private_key = PrivateKey::generate();
    let new_account_public_key = new_account_private_key.public_key();

    let response = AccountCreateTransaction::new()
        .set_key(new_account_public_key)
        .set_initial_balance(Hbar::from_tinybars(INITIAL_BALANCE_TINYBARS))
        .execute(client)?;

    let receipt = response.get_receipt(client)?;
    if !receipt.status.is_success() {
        return Err(OperationError::ReceiptStatus {
            status: receipt.status,
        });
    }

    let account_id = receipt.account_id.ok_or(OperationError::ReceiptNotFound(
        response.transaction_id.id.clone(),
    ))?;

    Ok((account_id, new_account_private_key))
}

// Debit/credit pair summing to zero; the network enforces conservation.
fn transfer_transaction(
    client: &Client,
    from_account: AccountId,
    to_account: AccountId,
    amount: Hbar,
) -> Result<TransactionReceipt, OperationError> {
    let response = TransferTransaction::new()
        .add_hbar_transfer(from_account, -amount)
        .add_hbar_transfer(to_account, amount)
        .execute(client)?;

    response.get_receipt(client)
}

fn get_account_balance(
    client: &Client,
    account_id: AccountId,
) -> Result<AccountBalance, QueryError> {
    AccountBalanceQuery::new()
        .set_account_id(account_id)
        .execute(client)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Grab the operator account ID and private key from the .env file
    let operator = OperatorConfig::load()?;

    println!("The account ID is = {}", operator.account_id);
    println!("The private key is = {}", operator.private_key);

    // Create the testnet client and bind the operator to it
    let mut client = Client::for_testnet();
    client.set_operator(operator.account_id, operator.private_key);
    info!(
        "Client bound to testnet with operator {}",
        operator.account_id
    );

    let (new_account_id, new_account_key) = create_new_account(&client)?;
    println!("The new account ID is {}", new_account_id);
    println!("The new account private key is {}", new_account_key);

    let account_balance = get_account_balance(&client, new_account_id)?;
    println!(
        "The account balance for the new account is {}",
        account_balance.hbars.as_tinybars()
    );

    let transfer_receipt = transfer_transaction(
        &client,
        operator.account_id,
        new_account_id,
        Hbar::from_tinybars(TRANSFER_TINYBARS),
    )?;
    println!(
        "The transaction consensus status is {}",
        transfer_receipt.status
    );

    let account_balance = get_account_balance(&client, new_account_id)?;
    println!(
        "The account balance for the new account is {}",
        account_balance.hbars.as_tinybars()
    );

    // Ask what the balance query would cost without running it
    let cost = AccountBalanceQuery::new()
        .set_account_id(new_account_id)
        .get_cost(&client)?;
    println!("The account balance query cost is: {}", cost);

    Ok(())
}
