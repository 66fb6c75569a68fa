//! Generic relayed call: any canister, any method, at most one text argument

use super::{OperationKind, OperationReport, Operator};
use crate::_2_RESULT_INTERPRETER::{interpret_generic, CallReply};
use crate::_3_CALL_RELAY::transport::Connector;
use crate::_5_INFORMATIONAL::OperationObserver;
use crate::infrastructure::{parse_principal, Clock, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    pub caller: String,
    pub canister: String,
    pub method: String,
    /// Sent as a single candid `text`; no arguments when `None`
    pub arg: Option<String>,
}

impl<C: Connector, K: Clock, O: OperationObserver> Operator<C, K, O> {
    pub async fn call(&self, request: &CallRequest) -> Result<OperationReport<CallReply>> {
        let target = parse_principal(&request.canister)?;

        match &request.arg {
            Some(text) => {
                self.run(
                    OperationKind::Call,
                    &request.caller,
                    target,
                    &request.method,
                    (text.clone(),),
                    interpret_generic,
                )
                .await
            }
            None => {
                self.run(OperationKind::Call, &request.caller, target, &request.method, (), interpret_generic)
                    .await
            }
        }
    }
}
