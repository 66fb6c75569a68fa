//! Wallet Relay - Wallet-relayed canister calls with numbered zones
//!
//! Architecture:
//! 1_OPERATIONS - Approve, swap, add liquidity, generic call, wallet batches
//! 2_RESULT_INTERPRETER - Typed decoding of canister replies
//! 3_CALL_RELAY - wallet_call envelopes and the network transport
//! 4_ACCOUNTS - Identities, balances, the account book
//! 5_INFORMATIONAL - Observers and display formatting
//! 6_INFRASTRUCTURE - Config, errors, constants, math, clock, logging

// Import numbered modules with explicit paths
#[path = "1_OPERATIONS/mod.rs"]
pub mod operations_1;
pub use operations_1 as _1_OPERATIONS;

#[path = "2_RESULT_INTERPRETER/mod.rs"]
pub mod result_interpreter_2;
pub use result_interpreter_2 as _2_RESULT_INTERPRETER;

#[path = "3_CALL_RELAY/mod.rs"]
pub mod call_relay_3;
pub use call_relay_3 as _3_CALL_RELAY;

#[path = "4_ACCOUNTS/mod.rs"]
pub mod accounts_4;
pub use accounts_4 as _4_ACCOUNTS;

#[path = "5_INFORMATIONAL/mod.rs"]
pub mod informational_5;
pub use informational_5 as _5_INFORMATIONAL;

#[path = "6_INFRASTRUCTURE/mod.rs"]
pub mod infrastructure_6;
pub use infrastructure_6 as infrastructure;

pub mod types;

// ===== PUBLIC API =====

pub use _1_OPERATIONS::approve::ApproveRequest;
pub use _1_OPERATIONS::liquidity::AddLiquidityRequest;
pub use _1_OPERATIONS::query::CallRequest;
pub use _1_OPERATIONS::swap::SwapRequest;
pub use _1_OPERATIONS::{OperationKind, OperationReport, Operator};
pub use _3_CALL_RELAY::transport::AgentConnector;
pub use infrastructure::{CallerError, RelayConfig, Result};
