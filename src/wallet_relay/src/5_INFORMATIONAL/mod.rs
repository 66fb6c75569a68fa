//! Informational - Outcome formatting and reporting
//! Nothing here changes state; orchestrators call into it after the fact

pub mod display;
pub mod observer;

pub use display::{format_balance, format_report, OutcomeSummary};
pub use observer::{BalancePhase, OperationObserver, TracingObserver};
