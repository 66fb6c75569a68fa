//! # Operations
//!
//! Named, user-facing operations. Every relayed operation runs the same
//! template:
//!
//! ## Flow
//! 1. Validate inputs and build the canister arguments (amounts in minor
//!    units, deadlines from the injected clock, parsed principals)
//! 2. Load the caller's identity
//! 3. Connect a relay signing as the caller
//! 4. Optional balance snapshot
//! 5. Relay the call through the wallet canister
//! 6. Interpret the reply
//! 7. Report the outcome to the observer
//! 8. Optional balance snapshot
//!
//! Business rejections come back inside the report. Only infrastructure
//! failures (identity, relay, undecodable replies, bad input) are `Err`.
//!
//! ## Modules
//! - **approve/**: ICRC-2 `icrc2_approve`
//! - **swap/**: Kongswap `swap`
//! - **liquidity/**: Kongswap `add_liquidity`
//! - **query/**: any method with an optional text argument
//! - **wallets/**: identity generation and account book maintenance

pub mod approve;
pub mod liquidity;
pub mod query;
pub mod swap;
pub mod wallets;

#[cfg(test)]
mod tests;

use std::fmt;

use candid::utils::ArgumentEncoder;
use candid::Principal;
use rust_decimal::Decimal;

use crate::_3_CALL_RELAY::transport::{CanisterTransport, Connector};
use crate::_3_CALL_RELAY::{CallRelay, ResultEnvelope};
use crate::_4_ACCOUNTS::balance::{BalanceOracle, BalanceReading};
use crate::_4_ACCOUNTS::identity::IdentityStore;
use crate::_5_INFORMATIONAL::{BalancePhase, OperationObserver, OutcomeSummary, TracingObserver};
use crate::infrastructure::{Clock, InterpretError, RelayConfig, Result, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Approve,
    Swap,
    AddLiquidity,
    Call,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Approve => "approve",
            OperationKind::Swap => "swap",
            OperationKind::AddLiquidity => "add-liquidity",
            OperationKind::Call => "call",
        };
        f.write_str(name)
    }
}

/// What one operation did, from the caller's point of view
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport<T> {
    pub kind: OperationKind,
    pub caller: Principal,
    pub account_id: String,
    pub target: Principal,
    pub method: String,
    pub outcome: T,
    /// `None` when snapshots are disabled
    pub balance_before: Option<BalanceReading>,
    pub balance_after: Option<BalanceReading>,
}

impl<T> OperationReport<T> {
    /// After minus before, when both snapshots succeeded
    pub fn balance_delta(&self) -> Option<Decimal> {
        let before = self.balance_before.as_ref()?.amount()?;
        let after = self.balance_after.as_ref()?.amount()?;
        Some(after - before)
    }
}

/// Runs operations against one configuration
///
/// The connector, clock and observer are injected so the whole template can
/// run against in-memory transports with a frozen clock.
pub struct Operator<C: Connector, K: Clock = SystemClock, O: OperationObserver = TracingObserver> {
    connector: C,
    clock: K,
    observer: O,
    config: RelayConfig,
    store: IdentityStore,
}

impl<C: Connector> Operator<C> {
    pub fn new(connector: C, config: RelayConfig) -> Self {
        Self::with_parts(connector, SystemClock, TracingObserver, config)
    }
}

impl<C: Connector, K: Clock, O: OperationObserver> Operator<C, K, O> {
    pub fn with_parts(connector: C, clock: K, observer: O, config: RelayConfig) -> Self {
        let store = IdentityStore::new(config.identity_dir.clone());
        Self { connector, clock, observer, config, store }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn store(&self) -> &IdentityStore {
        &self.store
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Shared template for every relayed operation
    async fn run<A, T, F>(
        &self,
        kind: OperationKind,
        caller: &str,
        target: Principal,
        method: &str,
        args: A,
        interpret: F,
    ) -> Result<OperationReport<T>>
    where
        A: ArgumentEncoder,
        T: OutcomeSummary,
        F: FnOnce(&ResultEnvelope) -> std::result::Result<T, InterpretError>,
    {
        let result = self.execute(kind, caller, target, method, args, interpret).await;
        if let Err(e) = &result {
            self.observer.on_failure(kind, e);
        }
        result
    }

    async fn execute<A, T, F>(
        &self,
        kind: OperationKind,
        caller: &str,
        target: Principal,
        method: &str,
        args: A,
        interpret: F,
    ) -> Result<OperationReport<T>>
    where
        A: ArgumentEncoder,
        T: OutcomeSummary,
        F: FnOnce(&ResultEnvelope) -> std::result::Result<T, InterpretError>,
    {
        let wallet = self.config.wallet_principal()?;
        let ledger = self.config.ledger_principal()?;
        let loaded = self.store.load(caller)?;
        let principal = loaded.principal;
        let account_id = loaded.account_id;

        self.observer.on_start(kind, &principal, &account_id);

        let relay =
            CallRelay::connect(&self.connector, loaded.identity, wallet, self.config.call_timeout()).await?;

        let balance_before = self
            .snapshot(kind, BalancePhase::Before, relay.transport(), ledger, &account_id)
            .await;

        let envelope = relay.relay(target, method, args, self.config.cycle_budget).await?;
        let outcome = interpret(&envelope)?;

        self.observer.on_outcome(kind, outcome.succeeded(), &outcome.summary());

        let balance_after = self
            .snapshot(kind, BalancePhase::After, relay.transport(), ledger, &account_id)
            .await;

        Ok(OperationReport {
            kind,
            caller: principal,
            account_id,
            target,
            method: method.to_string(),
            outcome,
            balance_before,
            balance_after,
        })
    }

    async fn snapshot<T: CanisterTransport>(
        &self,
        kind: OperationKind,
        phase: BalancePhase,
        transport: &T,
        ledger: Principal,
        account_id: &str,
    ) -> Option<BalanceReading> {
        if !self.config.log_balances {
            return None;
        }
        let reading = BalanceOracle::new(transport, ledger)
            .with_timeout(self.config.call_timeout())
            .read(account_id)
            .await;
        self.observer.on_balance(kind, phase, &reading);
        Some(reading)
    }
}
