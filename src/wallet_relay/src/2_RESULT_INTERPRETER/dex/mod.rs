//! Kongswap replies: `variant { Ok: Reply; Err: text }`
//!
//! Unlike ICRC-2, Kongswap reports failures as free text. We keep that text
//! verbatim and do not try to parse it into cases.

use tracing::{info, warn};

use super::decode_shape;
use crate::_3_CALL_RELAY::ResultEnvelope;
use crate::infrastructure::InterpretError;
use crate::types::kongswap::{AddLiquidityReply, AddLiquidityResult, SwapReply, SwapResult};

#[derive(Debug, Clone, PartialEq)]
pub enum DexOutcome<T> {
    Completed(T),
    Rejected(String),
}

impl<T> DexOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, DexOutcome::Completed(_))
    }
}

impl<T> From<std::result::Result<T, String>> for DexOutcome<T> {
    fn from(result: std::result::Result<T, String>) -> Self {
        match result {
            Ok(reply) => DexOutcome::Completed(reply),
            Err(message) => DexOutcome::Rejected(message),
        }
    }
}

pub fn interpret_swap(envelope: &ResultEnvelope) -> std::result::Result<DexOutcome<SwapReply>, InterpretError> {
    let result: SwapResult = decode_shape("swap", &envelope.reply)?;
    match &result {
        Ok(reply) => info!(
            "✅ Swap complete: {} {} → {} {} (price {}, slippage {:.2}%)",
            reply.pay_amount, reply.pay_symbol, reply.receive_amount, reply.receive_symbol, reply.price, reply.slippage
        ),
        Err(message) => warn!("❌ Swap rejected by Kongswap: {}", message),
    }
    Ok(result.into())
}

pub fn interpret_add_liquidity(
    envelope: &ResultEnvelope,
) -> std::result::Result<DexOutcome<AddLiquidityReply>, InterpretError> {
    let result: AddLiquidityResult = decode_shape("add_liquidity", &envelope.reply)?;
    match &result {
        Ok(reply) => info!(
            "✅ Liquidity added: {} {} + {} {} → {} {}",
            reply.amount_0, reply.symbol_0, reply.amount_1, reply.symbol_1, reply.add_lp_token_amount, reply.symbol
        ),
        Err(message) => warn!("❌ Add liquidity rejected by Kongswap: {}", message),
    }
    Ok(result.into())
}
