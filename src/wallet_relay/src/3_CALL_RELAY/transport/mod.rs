//! # Canister Transport
//!
//! The narrow seam between this crate and the IC network. Production code
//! talks to a replica through `ic-agent`; tests plug in `mock::MockTransport`.
//!
//! ## Failure classes
//! - `Unreachable`: nothing reached the replica (bad endpoint, DNS, root key,
//!   refused connection)
//! - `Rejected`: the canister or replica answered with a reject, certified or
//!   not; an uncertified reject means the message was never accepted
//! - `Failed`: the message may have been submitted, outcome unknown

use std::time::Duration;

use async_trait::async_trait;
use candid::Principal;
use ic_agent::identity::{AnonymousIdentity, Secp256k1Identity};
use ic_agent::{Agent, AgentError, Identity};
use tracing::{debug, warn};
use url::Url;

use crate::infrastructure::{RelayError, CALL_TIMEOUT_SECS, PRODUCTION_HOSTS};

#[cfg(test)]
pub mod mock;

#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    Unreachable(String),
    Rejected { code: String, message: String },
    Failed(String),
}

#[async_trait]
pub trait CanisterTransport: Send + Sync {
    /// Read-only query, not routed through consensus
    async fn query(
        &self,
        canister: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> std::result::Result<Vec<u8>, TransportFailure>;

    /// State-changing call; waits for the certified reply
    async fn update(
        &self,
        canister: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> std::result::Result<Vec<u8>, TransportFailure>;
}

/// Builds a transport signing as a given identity
#[async_trait]
pub trait Connector: Send + Sync {
    type Transport: CanisterTransport;

    async fn connect(&self, identity: Secp256k1Identity) -> std::result::Result<Self::Transport, RelayError>;

    async fn connect_anonymous(&self) -> std::result::Result<Self::Transport, RelayError>;
}

// === IC-AGENT IMPLEMENTATION ===

pub struct AgentTransport {
    agent: Agent,
}

#[async_trait]
impl CanisterTransport for AgentTransport {
    async fn query(
        &self,
        canister: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> std::result::Result<Vec<u8>, TransportFailure> {
        self.agent
            .query(canister, method)
            .with_arg(arg)
            .call()
            .await
            .map_err(|e| classify_agent_error(e, false))
    }

    async fn update(
        &self,
        canister: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> std::result::Result<Vec<u8>, TransportFailure> {
        self.agent
            .update(canister, method)
            .with_arg(arg)
            .call_and_wait()
            .await
            .map_err(|e| classify_agent_error(e, true))
    }
}

fn classify_agent_error(err: AgentError, submitted: bool) -> TransportFailure {
    match err {
        AgentError::CertifiedReject(reject) | AgentError::UncertifiedReject(reject) => TransportFailure::Rejected {
            code: format!("{:?}", reject.reject_code),
            message: reject.reject_message,
        },
        // The TCP connect itself failed, so no request body went out
        AgentError::TransportError(e) if e.is_connect() => TransportFailure::Unreachable(e.to_string()),
        other if submitted => TransportFailure::Failed(other.to_string()),
        other => TransportFailure::Unreachable(other.to_string()),
    }
}

/// Connects `ic-agent` transports to one network endpoint
#[derive(Debug, Clone)]
pub struct AgentConnector {
    endpoint: String,
    timeout: Duration,
}

impl AgentConnector {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), timeout: Duration::from_secs(CALL_TIMEOUT_SECS) }
    }

    /// Bound on the root-key fetch done while connecting
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn build<I: Identity + 'static>(&self, identity: I) -> std::result::Result<AgentTransport, RelayError> {
        let endpoint = resolve_endpoint(&self.endpoint).await?;

        let agent = Agent::builder()
            .with_url(endpoint.url.as_str())
            .with_identity(identity)
            .build()
            .map_err(|e| unreachable_error(format!("agent build failed: {}", e)))?;

        // Local replicas and testnets sign with their own root key
        if !endpoint.production {
            debug!("Fetching root key from {}", endpoint.url);
            tokio::time::timeout(self.timeout, agent.fetch_root_key())
                .await
                .map_err(|_| {
                    warn!("⏱️ Root key fetch from {} took longer than {:?}", endpoint.url, self.timeout);
                    unreachable_error(format!("root key fetch timed out after {}s", self.timeout.as_secs()))
                })?
                .map_err(|e| {
                    warn!("⚠️ Root key fetch from {} failed: {}", endpoint.url, e);
                    unreachable_error(format!("root key fetch failed: {}", e))
                })?;
        }

        Ok(AgentTransport { agent })
    }
}

#[async_trait]
impl Connector for AgentConnector {
    type Transport = AgentTransport;

    async fn connect(&self, identity: Secp256k1Identity) -> std::result::Result<AgentTransport, RelayError> {
        self.build(identity).await
    }

    async fn connect_anonymous(&self) -> std::result::Result<AgentTransport, RelayError> {
        self.build(AnonymousIdentity).await
    }
}

/// A network URL that passed resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoint {
    pub url: Url,
    pub production: bool,
}

/// Parse and DNS-resolve `endpoint` before anything is signed or sent
pub async fn resolve_endpoint(endpoint: &str) -> std::result::Result<ResolvedEndpoint, RelayError> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| unreachable_error(format!("invalid network URL {:?}: {}", endpoint, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(unreachable_error(format!("unsupported URL scheme {:?}", url.scheme())));
    }

    let host = url
        .host_str()
        .ok_or_else(|| unreachable_error(format!("network URL {:?} has no host", endpoint)))?
        .to_string();
    let port = url.port_or_known_default().unwrap_or(443);

    let resolved = tokio::net::lookup_host(format!("{}:{}", host, port))
        .await
        .map(|mut addrs| addrs.next().is_some())
        .unwrap_or(false);
    if !resolved {
        return Err(unreachable_error(format!("cannot resolve host {:?}", host)));
    }

    Ok(ResolvedEndpoint { production: is_production_host(&host), url })
}

pub fn is_production_host(host: &str) -> bool {
    PRODUCTION_HOSTS
        .iter()
        .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
}

fn unreachable_error(reason: String) -> RelayError {
    RelayError::Transport { reason, submitted: false }
}
