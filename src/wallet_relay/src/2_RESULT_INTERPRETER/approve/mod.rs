//! ICRC-2 approve replies
//!
//! The ledger answers with either a block index or exactly one
//! `ApproveError` case. Both map onto `ApproveOutcome`; a rejection keeps
//! all of its variant detail (balance, expected fee, ledger time, ...).

use candid::Nat;
use tracing::{info, warn};

use super::decode_shape;
use crate::_3_CALL_RELAY::ResultEnvelope;
use crate::infrastructure::InterpretError;
use crate::types::icrc::{ApproveError, ApproveResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    Approved { block_index: Nat },
    Rejected(ApproveError),
}

impl ApproveOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, ApproveOutcome::Approved { .. })
    }
}

pub fn interpret_approve(envelope: &ResultEnvelope) -> std::result::Result<ApproveOutcome, InterpretError> {
    let result: ApproveResult = decode_shape("icrc2_approve", &envelope.reply)?;

    match result {
        Ok(block_index) => {
            info!("✅ Approval accepted at block {}", block_index);
            Ok(ApproveOutcome::Approved { block_index })
        }
        Err(err) => {
            warn!("❌ Approval rejected: {}", err.describe());
            Ok(ApproveOutcome::Rejected(err))
        }
    }
}

impl ApproveError {
    /// Variant name, for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            ApproveError::GenericError { .. } => "GenericError",
            ApproveError::TemporarilyUnavailable => "TemporarilyUnavailable",
            ApproveError::Duplicate { .. } => "Duplicate",
            ApproveError::BadFee { .. } => "BadFee",
            ApproveError::AllowanceChanged { .. } => "AllowanceChanged",
            ApproveError::CreatedInFuture { .. } => "CreatedInFuture",
            ApproveError::TooOld => "TooOld",
            ApproveError::Expired { .. } => "Expired",
            ApproveError::InsufficientFunds { .. } => "InsufficientFunds",
        }
    }

    /// Human-readable description including the variant's payload
    pub fn describe(&self) -> String {
        match self {
            ApproveError::GenericError { message, error_code } => {
                format!("GenericError (code {}): {}", error_code, message)
            }
            ApproveError::TemporarilyUnavailable => "ledger temporarily unavailable".to_string(),
            ApproveError::Duplicate { duplicate_of } => {
                format!("duplicate of transaction {}", duplicate_of)
            }
            ApproveError::BadFee { expected_fee } => format!("bad fee, ledger expects {}", expected_fee),
            ApproveError::AllowanceChanged { current_allowance } => {
                format!("allowance changed, current allowance is {}", current_allowance)
            }
            ApproveError::CreatedInFuture { ledger_time } => {
                format!("created in the future (ledger time {})", ledger_time)
            }
            ApproveError::TooOld => "created_at_time is too old".to_string(),
            ApproveError::Expired { ledger_time } => {
                format!("approval already expired (ledger time {})", ledger_time)
            }
            ApproveError::InsufficientFunds { balance } => {
                format!("insufficient funds, balance is {}", balance)
            }
        }
    }

    /// Rejections that may succeed if the same request is rebuilt and sent again
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApproveError::TemporarilyUnavailable | ApproveError::CreatedInFuture { .. } | ApproveError::TooOld
        )
    }
}
