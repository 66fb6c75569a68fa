//! # Call Relay
//!
//! Routes a method call through a cycles wallet canister. The wallet forwards
//! the call to the target canister, attaches the cycle budget and hands back
//! the target's raw reply.
//!
//! ## Relay Flow
//! 1. Encode the caller's arguments with candid
//! 2. Wrap them in a `wallet_call` envelope (target, method, args, cycles)
//! 3. Submit the envelope to the wallet as an update call
//! 4. Wait for exactly one reply, bounded by the call timeout
//! 5. Unwrap `Ok { return }` into a `ResultEnvelope`
//!
//! ## Failure Semantics
//! - Endpoint problems surface at connect time, before anything is signed
//! - A wallet `Err` or canister reject is an authorization failure
//! - Anything lost after submission (transport, timeout) is outcome-unknown
//! - Nothing is retried here. Re-issuing is the caller's decision.

pub mod transport;

use std::time::Duration;

use candid::utils::ArgumentEncoder;
use candid::{decode_one, encode_args, encode_one, Principal};
use ic_agent::identity::Secp256k1Identity;
use serde_bytes::ByteBuf;
use tracing::{debug, info, warn};

use crate::infrastructure::{RelayError, WALLET_CALL_METHOD};
use crate::types::wallet::{WalletCallArgs, WalletCallResult};
use transport::{CanisterTransport, Connector, TransportFailure};

/// One call, ready to be handed to the wallet
#[derive(Debug, Clone, PartialEq)]
pub struct CallEnvelope {
    pub target: Principal,
    pub method: String,
    pub args: Vec<u8>,
    pub cycles: u64,
}

impl CallEnvelope {
    /// Encode `args` for `method` on `target`
    pub fn build<A: ArgumentEncoder>(
        target: Principal,
        method: &str,
        args: A,
        cycles: u64,
    ) -> std::result::Result<Self, RelayError> {
        let args = encode_args(args).map_err(|e| RelayError::Encoding {
            method: method.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { target, method: method.to_string(), args, cycles })
    }
}

/// Raw reply of the target canister, as forwarded by the wallet
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    pub target: Principal,
    pub method: String,
    pub reply: Vec<u8>,
}

pub struct CallRelay<T: CanisterTransport> {
    transport: T,
    wallet: Principal,
    timeout: Duration,
}

impl<T: CanisterTransport> CallRelay<T> {
    pub fn new(transport: T, wallet: Principal, timeout: Duration) -> Self {
        Self { transport, wallet, timeout }
    }

    /// Build a relay signing as `identity`; fails before any submission if
    /// the endpoint cannot be reached
    pub async fn connect<C>(
        connector: &C,
        identity: Secp256k1Identity,
        wallet: Principal,
        timeout: Duration,
    ) -> std::result::Result<Self, RelayError>
    where
        C: Connector<Transport = T>,
    {
        let transport = connector.connect(identity).await?;
        Ok(Self::new(transport, wallet, timeout))
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode, wrap and submit in one step
    pub async fn relay<A: ArgumentEncoder>(
        &self,
        target: Principal,
        method: &str,
        args: A,
        cycles: u64,
    ) -> std::result::Result<ResultEnvelope, RelayError> {
        let envelope = CallEnvelope::build(target, method, args, cycles)?;
        self.submit(envelope).await
    }

    /// Submit a prepared envelope through the wallet
    pub async fn submit(&self, envelope: CallEnvelope) -> std::result::Result<ResultEnvelope, RelayError> {
        let wallet_args = WalletCallArgs {
            canister: envelope.target,
            method_name: envelope.method.clone(),
            args: ByteBuf::from(envelope.args),
            cycles: envelope.cycles,
        };
        let payload = encode_one(&wallet_args).map_err(|e| RelayError::Encoding {
            method: WALLET_CALL_METHOD.to_string(),
            reason: e.to_string(),
        })?;

        info!(
            "📤 Relaying {}.{} via wallet {} ({} cycles)",
            envelope.target, envelope.method, self.wallet, envelope.cycles
        );

        let response = tokio::time::timeout(
            self.timeout,
            self.transport.update(&self.wallet, WALLET_CALL_METHOD, payload),
        )
        .await
        .map_err(|_| {
            warn!("⏱️ {} did not answer within {:?}", envelope.method, self.timeout);
            RelayError::Timeout {
                method: envelope.method.clone(),
                seconds: self.timeout.as_secs(),
            }
        })?;

        let raw = response.map_err(|failure| self.map_failure(failure))?;

        let wallet_result: WalletCallResult = decode_one(&raw).map_err(|e| RelayError::Transport {
            reason: format!("undecodable wallet reply: {}", e),
            submitted: true,
        })?;

        match wallet_result {
            Ok(reply) => {
                debug!("Wallet returned {} reply bytes for {}", reply.return_.len(), envelope.method);
                Ok(ResultEnvelope {
                    target: envelope.target,
                    method: envelope.method,
                    reply: reply.return_.into_vec(),
                })
            }
            Err(reason) => {
                warn!("❌ Wallet {} refused {}: {}", self.wallet, envelope.method, reason);
                Err(RelayError::Authorization { wallet: self.wallet.to_text(), reason })
            }
        }
    }

    fn map_failure(&self, failure: TransportFailure) -> RelayError {
        match failure {
            TransportFailure::Unreachable(reason) => RelayError::Transport { reason, submitted: false },
            TransportFailure::Failed(reason) => RelayError::Transport { reason, submitted: true },
            TransportFailure::Rejected { code, message } => RelayError::Authorization {
                wallet: self.wallet.to_text(),
                reason: format!("{}: {}", code, message),
            },
        }
    }
}
