//! # Result Interpreter
//!
//! Turns the raw reply bytes of a relayed call into a typed outcome.
//!
//! ## Reply Shapes
//! - **approve/**: `variant { Ok: nat; Err: ApproveError }` with a closed
//!   set of nine business rejections
//! - **dex/**: Kongswap's `variant { Ok: Reply; Err: text }`
//! - **generic/**: any reply, rendered as candid text
//!
//! ## Classification Rules
//! - Business rejections are outcomes, not errors
//! - Valid candid that matches none of the expected shapes is
//!   `UnknownResult` (unknown variant tag, both or neither arm populated)
//! - Bytes that are not candid at all are `Decode`

pub mod approve;
pub mod dex;
pub mod generic;

#[cfg(test)]
mod tests;

use candid::{decode_one, CandidType, IDLArgs};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::infrastructure::InterpretError;

pub use approve::{interpret_approve, ApproveOutcome};
pub use dex::{interpret_add_liquidity, interpret_swap, DexOutcome};
pub use generic::{decode_text, interpret_generic, CallReply};

/// Decode `reply` as exactly one value of type `T`
pub(crate) fn decode_shape<T>(operation: &str, reply: &[u8]) -> std::result::Result<T, InterpretError>
where
    T: CandidType + DeserializeOwned,
{
    match decode_one::<T>(reply) {
        Ok(value) => Ok(value),
        Err(typed_error) => match IDLArgs::from_bytes(reply) {
            Ok(untyped) => {
                debug!("Unexpected {} reply shape: {}", operation, untyped);
                Err(InterpretError::UnknownResult {
                    operation: operation.to_string(),
                    reason: format!("{} (received {})", typed_error, untyped),
                })
            }
            Err(e) => Err(InterpretError::Decode {
                operation: operation.to_string(),
                reason: e.to_string(),
            }),
        },
    }
}
