// Kongswap backend types (subset of kong_backend.did)
//
// Reply records only list the fields we read. Candid record subtyping lets
// the decoder skip the rest.

use candid::{CandidType, Deserialize, Nat};
use serde::Serialize;

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SwapArgs {
    pub pay_token: String,
    pub pay_amount: Nat,
    pub pay_tx_id: Option<TxId>,
    pub receive_token: String,
    pub receive_amount: Option<Nat>,
    pub receive_address: Option<String>,
    pub max_slippage: Option<f64>,
    pub referred_by: Option<String>,
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum TxId {
    BlockIndex(Nat),
    TransactionId(String),
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SwapReply {
    pub tx_id: u64,
    pub status: String,
    pub pay_symbol: String,
    pub pay_amount: Nat,
    pub receive_symbol: String,
    pub receive_amount: Nat,
    pub price: f64,
    pub slippage: f64,
    pub ts: u64,
}

pub type SwapResult = std::result::Result<SwapReply, String>;

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AddLiquidityArgs {
    pub token_0: String,
    pub amount_0: Nat,
    pub tx_id_0: Option<TxId>,
    pub token_1: String,
    pub amount_1: Nat,
    pub tx_id_1: Option<TxId>,
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AddLiquidityReply {
    pub tx_id: u64,
    pub status: String,
    pub symbol: String,
    pub symbol_0: String,
    pub amount_0: Nat,
    pub symbol_1: String,
    pub amount_1: Nat,
    pub add_lp_token_amount: Nat,
    pub ts: u64,
}

pub type AddLiquidityResult = std::result::Result<AddLiquidityReply, String>;
