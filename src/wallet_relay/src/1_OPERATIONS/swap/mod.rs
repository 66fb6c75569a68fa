//! # Kongswap Swap
//!
//! Swaps `pay_token` for `receive_token` on Kongswap using the ICRC-2 flow:
//! the caller approves Kongswap first, then `swap` runs with
//! `pay_tx_id: None` and Kongswap pulls the funds itself.
//!
//! ## Key Constraints
//! - **Slippage**: percentage form (2.0 = 2%), between 0 and 10
//! - **Distinct tokens**: pay and receive must differ
//! - **Positive amount**: zero-amount swaps are rejected locally

use candid::Nat;
use rust_decimal::Decimal;
use tracing::debug;

use super::{OperationKind, OperationReport, Operator};
use crate::_2_RESULT_INTERPRETER::{interpret_swap, DexOutcome};
use crate::_3_CALL_RELAY::transport::Connector;
use crate::_5_INFORMATIONAL::OperationObserver;
use crate::infrastructure::{
    to_minor_units, Clock, Result, ValidationError, KONG_SWAP_METHOD, MAX_SLIPPAGE_PERCENT,
};
use crate::types::kongswap::{SwapArgs, SwapReply};

#[derive(Debug, Clone, PartialEq)]
pub struct SwapRequest {
    pub caller: String,
    /// Kongswap token symbol or `IC.<ledger id>`
    pub pay_token: String,
    pub pay_amount: Decimal,
    pub pay_decimals: u32,
    pub receive_token: String,
    /// Minimum to receive; Kongswap computes it when `None`
    pub receive_amount: Option<Decimal>,
    pub receive_decimals: u32,
    pub max_slippage: f64,
    /// Where the proceeds go; the caller when `None`
    pub receive_address: Option<String>,
}

pub fn validate_swap_request(request: &SwapRequest) -> Result<()> {
    if request.pay_amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount {
            amount: request.pay_amount.to_string(),
            reason: "pay amount must be greater than zero".to_string(),
        }
        .into());
    }

    if !(0.0..=MAX_SLIPPAGE_PERCENT).contains(&request.max_slippage) {
        return Err(ValidationError::InvalidSwap {
            reason: format!(
                "max slippage must be between 0% and {}%, got {:.2}%",
                MAX_SLIPPAGE_PERCENT, request.max_slippage
            ),
        }
        .into());
    }

    if request.pay_token.trim() == request.receive_token.trim() {
        return Err(ValidationError::SameToken { token: request.pay_token.clone() }.into());
    }

    Ok(())
}

pub fn build_swap_args(request: &SwapRequest) -> Result<SwapArgs> {
    validate_swap_request(request)?;

    let receive_amount: Option<Nat> = request
        .receive_amount
        .map(|amount| to_minor_units(amount, request.receive_decimals))
        .transpose()?;

    Ok(SwapArgs {
        pay_token: request.pay_token.trim().to_string(),
        pay_amount: to_minor_units(request.pay_amount, request.pay_decimals)?,
        pay_tx_id: None,
        receive_token: request.receive_token.trim().to_string(),
        receive_amount,
        receive_address: request.receive_address.clone(),
        max_slippage: Some(request.max_slippage),
        referred_by: None,
    })
}

impl<C: Connector, K: Clock, O: OperationObserver> Operator<C, K, O> {
    pub async fn swap(&self, request: &SwapRequest) -> Result<OperationReport<DexOutcome<SwapReply>>> {
        let args = build_swap_args(request)?;
        let kongswap = self.config.kongswap_principal()?;

        debug!(
            "🔄 Swap {} {} → {} (max slippage {:.2}%)",
            args.pay_amount, args.pay_token, args.receive_token, request.max_slippage
        );

        self.run(
            OperationKind::Swap,
            &request.caller,
            kongswap,
            KONG_SWAP_METHOD,
            (args,),
            interpret_swap,
        )
        .await
    }
}
