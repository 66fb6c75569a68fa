// Cycles wallet (`wallet.did`) and ICP ledger query types

use candid::{CandidType, Deserialize, Principal};
use serde::Serialize;
use serde_bytes::ByteBuf;

/// Argument of `wallet_call`: the call the wallet forwards on our behalf
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WalletCallArgs {
    pub canister: Principal,
    pub method_name: String,
    pub args: ByteBuf,
    pub cycles: u64,
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WalletCallReply {
    #[serde(rename = "return")]
    pub return_: ByteBuf,
}

/// `variant { Ok: record { return: blob }; Err: text }`
pub type WalletCallResult = std::result::Result<WalletCallReply, String>;

/// `account_balance_dfx` argument; the account is hex text, unlike
/// `ic_ledger_types::AccountBalanceArgs`
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AccountBalanceArgs {
    pub account: String,
}
