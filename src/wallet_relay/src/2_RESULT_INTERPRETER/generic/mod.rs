//! Replies of arbitrary methods, rendered as candid text

use candid::types::value::IDLValue;
use candid::IDLArgs;

use super::decode_shape;
use crate::_3_CALL_RELAY::ResultEnvelope;
use crate::infrastructure::InterpretError;

#[derive(Debug, Clone, PartialEq)]
pub struct CallReply {
    /// Candid text form, e.g. `("Hello, world!")`
    pub rendered: String,
    /// Set when the reply is a single `text` value
    pub text: Option<String>,
}

pub fn interpret_generic(envelope: &ResultEnvelope) -> std::result::Result<CallReply, InterpretError> {
    let args = IDLArgs::from_bytes(&envelope.reply).map_err(|e| InterpretError::Decode {
        operation: envelope.method.clone(),
        reason: e.to_string(),
    })?;

    let text = match args.args.as_slice() {
        [IDLValue::Text(text)] => Some(text.clone()),
        _ => None,
    };

    Ok(CallReply { rendered: args.to_string(), text })
}

/// Decode a reply that must be exactly one `text`
pub fn decode_text(envelope: &ResultEnvelope) -> std::result::Result<String, InterpretError> {
    decode_shape(&envelope.method, &envelope.reply)
}
