//! # Accounts
//!
//! Everything that touches local files or the ICP ledger balance:
//!
//! ### identity/
//! Generates secp256k1 identities and loads them back by label.
//!
//! ### account_book/
//! The `num, principalID, accountID, balance` table of generated wallets.
//!
//! ### balance/
//! `account_balance_dfx` lookups. Fallible on purpose: zero and "unknown"
//! are different answers.

pub mod account_book;
pub mod balance;
pub mod identity;
