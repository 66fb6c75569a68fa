//! Error taxonomy, one nested enum per layer
//!
//! Business rejections from a canister (`InsufficientFunds`, a Kongswap error
//! string, ...) are NOT represented here. They are normal outcomes and live in
//! `ApproveOutcome` / `DexOutcome`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CallerError>;

#[derive(Debug, Error)]
pub enum CallerError {
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("account book error: {0}")]
    Book(#[from] BookError),

    #[error("balance query error: {0}")]
    Oracle(#[from] OracleError),

    #[error("relay error: {0}")]
    Relay(#[from] RelayError),

    #[error("result error: {0}")]
    Interpret(#[from] InterpretError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

// === IDENTITY / FILE LAYER ===

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to generate identity: {reason}")]
    Generation { reason: String },

    #[error("failed to persist identity to {path}: {reason}")]
    Persistence { path: String, reason: String },

    #[error("identity file not found: {path}")]
    NotFound { path: String },

    #[error("identity file {path} is malformed: {reason}")]
    Format { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum BookError {
    #[error("failed to read account book {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to write account book {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("account book {path} already exists")]
    Exists { path: String },
}

// === ORACLE ===

/// A balance query that failed. Retryable by the caller; never a zero balance.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OracleError {
    #[error("ledger unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("ledger rejected balance query: {reason}")]
    Rejected { reason: String },

    #[error("could not decode balance reply: {reason}")]
    Decode { reason: String },

    #[error("ledger did not answer within {seconds}s")]
    Timeout { seconds: u64 },
}

// === RELAY LAYER ===

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RelayError {
    #[error("could not encode arguments for {method}: {reason}")]
    Encoding { method: String, reason: String },

    #[error("transport failure ({}): {reason}", if *submitted { "call submitted, outcome unknown" } else { "nothing submitted" })]
    Transport { reason: String, submitted: bool },

    #[error("wallet {wallet} refused the call: {reason}")]
    Authorization { wallet: String, reason: String },

    #[error("no reply from {method} within {seconds}s, outcome unknown")]
    Timeout { method: String, seconds: u64 },
}

impl RelayError {
    /// True when the call may have executed on the ledger anyway.
    pub fn outcome_unknown(&self) -> bool {
        match self {
            RelayError::Transport { submitted, .. } => *submitted,
            RelayError::Timeout { .. } => true,
            RelayError::Encoding { .. } | RelayError::Authorization { .. } => false,
        }
    }
}

// === INTERPRETER ===

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InterpretError {
    /// Reply is well-formed candid but not one of the shapes we know.
    #[error("unknown result shape for {operation}: {reason}")]
    UnknownResult { operation: String, reason: String },

    /// Reply is not candid at all.
    #[error("malformed reply for {operation}: {reason}")]
    Decode { operation: String, reason: String },
}

// === INPUT VALIDATION ===

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid principal {principal}: {reason}")]
    InvalidPrincipal { principal: String, reason: String },

    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("invalid swap: {reason}")]
    InvalidSwap { reason: String },

    #[error("both sides use the same token: {token}")]
    SameToken { token: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("missing required setting: {name}")]
    Missing { name: String },
}
