use log::{debug, info};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::accounts_constants::{
    ACCOUNT_NUMBER_DIGITS, ACCOUNT_NUMBER_PREFIX, TRANSACTION_NUMBER_PREFIX,
};
use super::accounts_model::{
    Account, CashMovement, CashTransaction, NewAccount, NewCashTransaction,
};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::clients::ClientRepositoryTrait;
use crate::constants::DEFAULT_CURRENCY;
use crate::errors::Result;
use crate::utils::decimal_utils::round_money;
use crate::Error;

/// Service for opening accounts and moving cash in and out of them.
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
    client_repository: Arc<dyn ClientRepositoryTrait>,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepositoryTrait>,
        client_repository: Arc<dyn ClientRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            client_repository,
        }
    }
}

/// Random account number such as `ACC0123456789`.
pub fn generate_account_number() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..ACCOUNT_NUMBER_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("{}{}", ACCOUNT_NUMBER_PREFIX, digits)
}

/// Transaction number such as `TRX20240304153012K3F9QZ`.
pub fn generate_transaction_number() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!(
        "{}{}{}",
        TRANSACTION_NUMBER_PREFIX,
        chrono::Utc::now().format("%Y%m%d%H%M%S"),
        suffix
    )
}

impl AccountService {
    fn record_movement(
        &self,
        account_id: i64,
        movement: CashMovement,
        description: Option<String>,
        acting_user: &str,
    ) -> Result<CashTransaction> {
        movement.validate()?;
        let transaction = self.repository.apply_cash_movement(NewCashTransaction {
            transaction_number: generate_transaction_number(),
            account_id,
            movement,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_by: acting_user.to_string(),
        })?;
        info!(
            "{} {} on account {}: balance {} -> {}",
            transaction.transaction_type,
            transaction.amount,
            account_id,
            transaction.previous_balance,
            transaction.new_balance
        );
        Ok(transaction)
    }
}

impl AccountServiceTrait for AccountService {
    fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        let client = self.client_repository.get_by_id(new_account.client_id)?;
        if !client.is_active {
            return Err(Error::invalid(format!("Client {} is not active", client.id)));
        }

        let prepared = NewAccount {
            account_number: Some(
                new_account
                    .account_number
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(generate_account_number),
            ),
            currency: Some(
                new_account
                    .currency
                    .map(|c| c.trim().to_uppercase())
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            ),
            opening_balance: round_money(new_account.opening_balance),
            ..new_account
        };
        let account = self.repository.create(prepared)?;
        info!(
            "Opened {} account {} for client {}",
            account.account_type, account.account_number, account.client_id
        );
        Ok(account)
    }

    fn get_account(&self, account_id: i64) -> Result<Account> {
        self.repository.get_by_id(account_id)
    }

    fn list_client_accounts(&self, client_id: i64) -> Result<Vec<Account>> {
        self.repository.list_by_client(client_id)
    }

    fn deposit(
        &self,
        account_id: i64,
        amount: Decimal,
        description: Option<String>,
        acting_user: &str,
    ) -> Result<CashTransaction> {
        debug!("Depositing {} into account {}", amount, account_id);
        self.record_movement(account_id, CashMovement::Deposit(amount), description, acting_user)
    }

    fn withdraw(
        &self,
        account_id: i64,
        amount: Decimal,
        description: Option<String>,
        acting_user: &str,
    ) -> Result<CashTransaction> {
        debug!("Withdrawing {} from account {}", amount, account_id);
        self.record_movement(
            account_id,
            CashMovement::Withdrawal(amount),
            description,
            acting_user,
        )
    }

    fn list_account_transactions(&self, account_id: i64) -> Result<Vec<CashTransaction>> {
        self.repository.get_by_id(account_id)?;
        self.repository.list_transactions(account_id)
    }

    fn cash_balance(&self, client_id: i64) -> Result<Decimal> {
        Ok(self
            .repository
            .list_by_client(client_id)?
            .iter()
            .map(|a| a.balance)
            .sum())
    }
}
