//! Operation observers
//!
//! Orchestrators never log outcomes themselves; they hand each step to an
//! `OperationObserver`. The binary uses `TracingObserver`.

use candid::Principal;
use tracing::{error, info, warn};

use super::display::format_balance;
use crate::_1_OPERATIONS::OperationKind;
use crate::_4_ACCOUNTS::balance::BalanceReading;
use crate::infrastructure::CallerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalancePhase {
    Before,
    After,
}

pub trait OperationObserver: Send + Sync {
    fn on_start(&self, kind: OperationKind, caller: &Principal, account_id: &str);

    fn on_balance(&self, kind: OperationKind, phase: BalancePhase, reading: &BalanceReading);

    fn on_outcome(&self, kind: OperationKind, succeeded: bool, summary: &str);

    fn on_failure(&self, kind: OperationKind, error: &CallerError);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl OperationObserver for TracingObserver {
    fn on_start(&self, kind: OperationKind, caller: &Principal, account_id: &str) {
        info!("🚀 {} as {} (account {})", kind, caller, account_id);
    }

    fn on_balance(&self, kind: OperationKind, phase: BalancePhase, reading: &BalanceReading) {
        let label = match phase {
            BalancePhase::Before => "before",
            BalancePhase::After => "after",
        };
        match reading {
            BalanceReading::Known(_) => info!("💰 Balance {} {}: {}", label, kind, format_balance(reading)),
            BalanceReading::Unavailable(_) => warn!("⚠️ Balance {} {}: {}", label, kind, format_balance(reading)),
        }
    }

    fn on_outcome(&self, kind: OperationKind, succeeded: bool, summary: &str) {
        if succeeded {
            info!("✅ {} {}", kind, summary);
        } else {
            warn!("❌ {} {}", kind, summary);
        }
    }

    fn on_failure(&self, kind: OperationKind, error: &CallerError) {
        if let CallerError::Relay(relay) = error {
            if relay.outcome_unknown() {
                error!("❓ {} outcome unknown, check the ledger before retrying: {}", kind, error);
                return;
            }
        }
        error!("❌ {} failed: {}", kind, error);
    }
}

/// Collects events as strings so tests can assert on the sequence
#[cfg(test)]
#[derive(Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
impl OperationObserver for RecordingObserver {
    fn on_start(&self, kind: OperationKind, caller: &Principal, _account_id: &str) {
        self.push(format!("start {} {}", kind, caller));
    }

    fn on_balance(&self, _kind: OperationKind, phase: BalancePhase, reading: &BalanceReading) {
        self.push(format!("balance {:?} {}", phase, format_balance(reading)));
    }

    fn on_outcome(&self, _kind: OperationKind, succeeded: bool, summary: &str) {
        self.push(format!("outcome {} {}", succeeded, summary));
    }

    fn on_failure(&self, _kind: OperationKind, error: &CallerError) {
        self.push(format!("failure {}", error));
    }
}
