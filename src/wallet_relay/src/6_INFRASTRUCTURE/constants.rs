//! Default canister ids and protocol constants
//!
//! These are only defaults. Everything here can be overridden through
//! `RelayConfig`, so tests and local replicas never depend on mainnet ids.

/// ICP ledger canister (mainnet)
pub const ICP_LEDGER_ID: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";

/// Kongswap backend canister (mainnet)
pub const KONGSWAP_BACKEND_ID: &str = "2ipq2-uqaaa-aaaar-qailq-cai";

/// Boundary node used when no network URL is configured
pub const DEFAULT_NETWORK_URL: &str = "https://icp-api.io";

/// Hosts that serve the mainnet root key; anything else fetches it at connect time
pub const PRODUCTION_HOSTS: &[&str] = &["icp-api.io", "ic0.app", "icp0.io"];

/// Cycles attached to every relayed call
pub const DEFAULT_CYCLE_BUDGET: u64 = 200_000_000;

/// Upper bound on a single relayed call, in seconds
pub const CALL_TIMEOUT_SECS: u64 = 30;

/// Deadline window for approvals: 5 minutes in nanoseconds
pub const DEADLINE_WINDOW_NANOS: u64 = 300_000_000_000;

/// ICP uses 8 decimals (e8s)
pub const ICP_DECIMALS: u32 = 8;

/// Methods called on remote canisters
pub const WALLET_CALL_METHOD: &str = "wallet_call";
pub const ACCOUNT_BALANCE_METHOD: &str = "account_balance_dfx";
pub const ICRC2_APPROVE_METHOD: &str = "icrc2_approve";
pub const KONG_SWAP_METHOD: &str = "swap";
pub const KONG_ADD_LIQUIDITY_METHOD: &str = "add_liquidity";

/// Account book defaults
pub const DEFAULT_ACCOUNT_BOOK: &str = "account.txt";
pub const ACCOUNT_BOOK_HEADER: &str = "num, principalID, accountID, balance";
pub const IDENTITY_FILE_EXTENSION: &str = "pem";

/// Maximum slippage accepted for swaps, in percent
pub const MAX_SLIPPAGE_PERCENT: f64 = 10.0;
