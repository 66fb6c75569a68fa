//! # Balance Oracle
//!
//! ICP balance lookups via the ledger's `account_balance_dfx` query.
//! A failed lookup is an `OracleError`, never a zero balance; what to do
//! about it (warn, write zero, abort) is the caller's call.

use std::time::Duration;

use candid::{decode_one, encode_one, Principal};
use ic_ledger_types::Tokens;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::_3_CALL_RELAY::transport::{CanisterTransport, TransportFailure};
use crate::infrastructure::{from_minor_units, OracleError, ACCOUNT_BALANCE_METHOD, CALL_TIMEOUT_SECS, ICP_DECIMALS};
use crate::types::wallet::AccountBalanceArgs;

/// Result of one balance lookup as carried in reports
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceReading {
    Known(Decimal),
    Unavailable(OracleError),
}

impl BalanceReading {
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            BalanceReading::Known(amount) => Some(*amount),
            BalanceReading::Unavailable(_) => None,
        }
    }
}

pub struct BalanceOracle<'a, T: CanisterTransport> {
    transport: &'a T,
    ledger: Principal,
    timeout: Duration,
}

impl<'a, T: CanisterTransport> BalanceOracle<'a, T> {
    pub fn new(transport: &'a T, ledger: Principal) -> Self {
        Self { transport, ledger, timeout: Duration::from_secs(CALL_TIMEOUT_SECS) }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Balance of `account_id` in ICP (e8s / 10^8). No retries.
    pub async fn query_balance(&self, account_id: &str) -> std::result::Result<Decimal, OracleError> {
        let arg = encode_one(AccountBalanceArgs { account: account_id.to_string() })
            .map_err(|e| OracleError::Decode { reason: format!("argument encoding failed: {}", e) })?;

        let raw = tokio::time::timeout(self.timeout, self.transport.query(&self.ledger, ACCOUNT_BALANCE_METHOD, arg))
            .await
            .map_err(|_| {
                warn!("⏱️ Balance query for {} took longer than {:?}", account_id, self.timeout);
                OracleError::Timeout { seconds: self.timeout.as_secs() }
            })?
            .map_err(|failure| {
                warn!("⚠️ Balance query for {} failed: {:?}", account_id, failure);
                match failure {
                    TransportFailure::Rejected { code, message } => OracleError::Rejected {
                        reason: format!("{}: {}", code, message),
                    },
                    TransportFailure::Unreachable(reason) | TransportFailure::Failed(reason) => {
                        OracleError::Unreachable { reason }
                    }
                }
            })?;

        let tokens: Tokens = decode_one(&raw).map_err(|e| OracleError::Decode { reason: e.to_string() })?;
        let balance = from_minor_units(tokens.e8s(), ICP_DECIMALS);

        debug!("Balance of {}: {} ICP ({} e8s)", account_id, balance, tokens.e8s());
        Ok(balance)
    }

    /// Same as `query_balance` but folded into a reading for reports
    pub async fn read(&self, account_id: &str) -> BalanceReading {
        match self.query_balance(account_id).await {
            Ok(amount) => BalanceReading::Known(amount),
            Err(err) => BalanceReading::Unavailable(err),
        }
    }
}
