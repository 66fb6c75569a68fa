//! Display module - One-line summaries of operation outcomes

use rust_decimal::Decimal;

use crate::_1_OPERATIONS::OperationReport;
use crate::_2_RESULT_INTERPRETER::{ApproveOutcome, CallReply, DexOutcome};
use crate::_4_ACCOUNTS::balance::BalanceReading;
use crate::types::kongswap::{AddLiquidityReply, SwapReply};

/// Anything an orchestrator can hand to an observer
pub trait OutcomeSummary {
    /// Did the target canister accept the request
    fn succeeded(&self) -> bool;
    fn summary(&self) -> String;
}

impl OutcomeSummary for ApproveOutcome {
    fn succeeded(&self) -> bool {
        self.is_approved()
    }

    fn summary(&self) -> String {
        match self {
            ApproveOutcome::Approved { block_index } => format!("approved at block {}", block_index),
            ApproveOutcome::Rejected(err) => format!("rejected ({}): {}", err.kind(), err.describe()),
        }
    }
}

impl OutcomeSummary for DexOutcome<SwapReply> {
    fn succeeded(&self) -> bool {
        self.is_completed()
    }

    fn summary(&self) -> String {
        match self {
            DexOutcome::Completed(reply) => format!(
                "swapped {} {} for {} {} (tx {}, price {}, slippage {:.2}%)",
                reply.pay_amount,
                reply.pay_symbol,
                reply.receive_amount,
                reply.receive_symbol,
                reply.tx_id,
                reply.price,
                reply.slippage
            ),
            DexOutcome::Rejected(message) => format!("rejected: {}", message),
        }
    }
}

impl OutcomeSummary for DexOutcome<AddLiquidityReply> {
    fn succeeded(&self) -> bool {
        self.is_completed()
    }

    fn summary(&self) -> String {
        match self {
            DexOutcome::Completed(reply) => format!(
                "added {} {} + {} {}, minted {} {} (tx {})",
                reply.amount_0,
                reply.symbol_0,
                reply.amount_1,
                reply.symbol_1,
                reply.add_lp_token_amount,
                reply.symbol,
                reply.tx_id
            ),
            DexOutcome::Rejected(message) => format!("rejected: {}", message),
        }
    }
}

impl OutcomeSummary for CallReply {
    fn succeeded(&self) -> bool {
        true
    }

    fn summary(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self.rendered.clone(),
        }
    }
}

pub fn format_balance(reading: &BalanceReading) -> String {
    match reading {
        BalanceReading::Known(amount) => format!("{:.6} ICP", amount),
        BalanceReading::Unavailable(err) => format!("unavailable ({})", err),
    }
}

/// Multi-line report as printed by the CLI
pub fn format_report<T: OutcomeSummary>(report: &OperationReport<T>) -> String {
    let mut lines = vec![
        format!("operation:  {}", report.kind),
        format!("caller:     {}", report.caller),
        format!("account:    {}", report.account_id),
        format!("target:     {}.{}", report.target, report.method),
        format!(
            "result:     {} {}",
            if report.outcome.succeeded() { "✅" } else { "❌" },
            report.outcome.summary()
        ),
    ];

    if let Some(before) = &report.balance_before {
        lines.push(format!("before:     {}", format_balance(before)));
    }
    if let Some(after) = &report.balance_after {
        lines.push(format!("after:      {}", format_balance(after)));
    }
    if let Some(delta) = report.balance_delta() {
        lines.push(format!("change:     {}", signed(delta)));
    }

    lines.join("\n")
}

fn signed(delta: Decimal) -> String {
    if delta.is_sign_negative() {
        format!("{:.6} ICP", delta)
    } else {
        format!("+{:.6} ICP", delta)
    }
}
