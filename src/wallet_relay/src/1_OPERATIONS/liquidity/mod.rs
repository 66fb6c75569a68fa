//! Kongswap `add_liquidity`
//!
//! Both tokens must be approved for Kongswap beforehand (ICRC-2 flow,
//! `tx_id_0`/`tx_id_1` are `None`).

use rust_decimal::Decimal;
use tracing::debug;

use super::{OperationKind, OperationReport, Operator};
use crate::_2_RESULT_INTERPRETER::{interpret_add_liquidity, DexOutcome};
use crate::_3_CALL_RELAY::transport::Connector;
use crate::_5_INFORMATIONAL::OperationObserver;
use crate::infrastructure::{to_minor_units, Clock, Result, ValidationError, KONG_ADD_LIQUIDITY_METHOD};
use crate::types::kongswap::{AddLiquidityArgs, AddLiquidityReply};

#[derive(Debug, Clone, PartialEq)]
pub struct AddLiquidityRequest {
    pub caller: String,
    pub token_0: String,
    pub amount_0: Decimal,
    pub decimals_0: u32,
    pub token_1: String,
    pub amount_1: Decimal,
    pub decimals_1: u32,
}

pub fn build_add_liquidity_args(request: &AddLiquidityRequest) -> Result<AddLiquidityArgs> {
    for amount in [request.amount_0, request.amount_1] {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount {
                amount: amount.to_string(),
                reason: "liquidity amounts must be greater than zero".to_string(),
            }
            .into());
        }
    }

    if request.token_0.trim() == request.token_1.trim() {
        return Err(ValidationError::SameToken { token: request.token_0.clone() }.into());
    }

    Ok(AddLiquidityArgs {
        token_0: request.token_0.trim().to_string(),
        amount_0: to_minor_units(request.amount_0, request.decimals_0)?,
        tx_id_0: None,
        token_1: request.token_1.trim().to_string(),
        amount_1: to_minor_units(request.amount_1, request.decimals_1)?,
        tx_id_1: None,
    })
}

impl<C: Connector, K: Clock, O: OperationObserver> Operator<C, K, O> {
    pub async fn add_liquidity(
        &self,
        request: &AddLiquidityRequest,
    ) -> Result<OperationReport<DexOutcome<AddLiquidityReply>>> {
        let args = build_add_liquidity_args(request)?;
        let kongswap = self.config.kongswap_principal()?;

        debug!(
            "💧 Add liquidity {} {} + {} {}",
            args.amount_0, args.token_0, args.amount_1, args.token_1
        );

        self.run(
            OperationKind::AddLiquidity,
            &request.caller,
            kongswap,
            KONG_ADD_LIQUIDITY_METHOD,
            (args,),
            interpret_add_liquidity,
        )
        .await
    }
}
