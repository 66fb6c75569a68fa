//! # ICRC-2 Approve
//!
//! Grants a spender (usually Kongswap) an allowance on a token ledger, so a
//! later swap or add-liquidity can pull funds with `transfer_from`.
//!
//! ## Arguments
//! - `amount` is converted from a decimal to the ledger's minor units
//! - `created_at_time` is the clock's current time
//! - `expires_at` is `now + deadline window` (5 minutes by default)
//! - `fee`, `memo` and `expected_allowance` are left to ledger defaults

use candid::{Nat, Principal};
use rust_decimal::Decimal;
use tracing::debug;

use super::{OperationKind, OperationReport, Operator};
use crate::_2_RESULT_INTERPRETER::{interpret_approve, ApproveOutcome};
use crate::_3_CALL_RELAY::transport::Connector;
use crate::_5_INFORMATIONAL::OperationObserver;
use crate::infrastructure::{
    parse_principal, to_minor_units, Clock, Result, ICP_DECIMALS, ICRC2_APPROVE_METHOD,
};
use crate::types::icrc::{Account, ApproveArgs};

#[derive(Debug, Clone, PartialEq)]
pub struct ApproveRequest {
    /// Identity label of the account granting the allowance
    pub caller: String,
    pub spender: String,
    pub amount: Decimal,
    /// Token ledger; the configured ICP ledger when `None`
    pub ledger: Option<String>,
    pub decimals: u32,
}

impl ApproveRequest {
    pub fn icp(caller: impl Into<String>, spender: impl Into<String>, amount: Decimal) -> Self {
        Self {
            caller: caller.into(),
            spender: spender.into(),
            amount,
            ledger: None,
            decimals: ICP_DECIMALS,
        }
    }
}

/// ApproveArgs for `spender`, stamped with the clock's current time
pub fn build_approve_args<K: Clock>(spender: Principal, amount: Nat, clock: &K, window_nanos: u64) -> ApproveArgs {
    ApproveArgs {
        from_subaccount: None,
        spender: Account { owner: spender, subaccount: None },
        amount,
        expected_allowance: None,
        expires_at: Some(clock.deadline_after(window_nanos)),
        fee: None,
        memo: None,
        created_at_time: Some(clock.now_nanos()),
    }
}

impl<C: Connector, K: Clock, O: OperationObserver> Operator<C, K, O> {
    pub async fn approve(&self, request: &ApproveRequest) -> Result<OperationReport<ApproveOutcome>> {
        let spender = parse_principal(&request.spender)?;
        let ledger = match &request.ledger {
            Some(ledger) => parse_principal(ledger)?,
            None => self.config.ledger_principal()?,
        };
        let amount = to_minor_units(request.amount, request.decimals)?;
        let args = build_approve_args(spender, amount, &self.clock, self.config.deadline_window_nanos);

        debug!(
            "Approve {} (minor units {}) for {} on {}, expires at {:?}",
            request.amount, args.amount, spender, ledger, args.expires_at
        );

        self.run(
            OperationKind::Approve,
            &request.caller,
            ledger,
            ICRC2_APPROVE_METHOD,
            (args,),
            interpret_approve,
        )
        .await
    }
}
