//! Wallet generation and account book maintenance
//!
//! Balance lookups here are anonymous queries; nothing is signed.

use rust_decimal::Decimal;
use tracing::info;

use super::Operator;
use crate::_3_CALL_RELAY::transport::Connector;
use crate::_4_ACCOUNTS::account_book::{AccountBook, AccountRecord, RefreshSummary};
use crate::_4_ACCOUNTS::balance::BalanceOracle;
use crate::_4_ACCOUNTS::identity::CreatedIdentity;
use crate::_5_INFORMATIONAL::OperationObserver;
use crate::infrastructure::{Clock, Result};

impl<C: Connector, K: Clock, O: OperationObserver> Operator<C, K, O> {
    pub fn account_book(&self) -> AccountBook {
        AccountBook::new(self.config.account_book.clone())
    }

    pub fn generate_wallet(&self) -> Result<CreatedIdentity> {
        self.store.create()
    }

    /// Generate `count` identities and write a fresh account book;
    /// an existing book is only replaced with `overwrite`
    pub fn generate_batch(&self, count: usize, overwrite: bool) -> Result<Vec<AccountRecord>> {
        info!("🔑 Generating {} wallets into {}", count, self.config.account_book.display());
        self.account_book().generate_batch(&self.store, count, overwrite)
    }

    /// Principal and account id of the identity stored under `label`
    pub fn describe_wallet(&self, label: &str) -> Result<CreatedIdentity> {
        let principal = self.store.principal_of(label)?;
        let account_id = self.store.account_id_of(label)?;
        Ok(CreatedIdentity { principal, account_id })
    }

    /// Re-query every balance in the account book
    pub async fn refresh_balances(&self) -> Result<RefreshSummary> {
        let transport = self.connector.connect_anonymous().await?;
        let oracle =
            BalanceOracle::new(&transport, self.config.ledger_principal()?).with_timeout(self.config.call_timeout());
        self.account_book().refresh_balances(&oracle).await
    }

    /// Current ICP balance of the identity stored under `label`
    pub async fn balance_of(&self, label: &str) -> Result<Decimal> {
        let account_id = self.store.account_id_of(label)?;
        let transport = self.connector.connect_anonymous().await?;
        let oracle =
            BalanceOracle::new(&transport, self.config.ledger_principal()?).with_timeout(self.config.call_timeout());
        Ok(oracle.query_balance(&account_id).await?)
    }
}
