//! Candid types for the canisters this client talks to

pub mod icrc;
pub mod kongswap;
pub mod wallet;
