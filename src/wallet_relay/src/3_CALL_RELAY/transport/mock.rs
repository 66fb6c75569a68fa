//! In-memory transport for tests
//!
//! Replies are scripted per method; every call is recorded so tests can
//! assert on what would have gone over the wire.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use candid::Principal;
use ic_agent::identity::Secp256k1Identity;
use ic_agent::Identity;

use super::{CanisterTransport, Connector, TransportFailure};
use crate::infrastructure::RelayError;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: &'static str,
    pub canister: Principal,
    pub method: String,
    pub arg: Vec<u8>,
}

type Reply = std::result::Result<Vec<u8>, TransportFailure>;

#[derive(Default)]
struct MockState {
    replies: HashMap<String, VecDeque<Reply>>,
    calls: Vec<RecordedCall>,
    update_delay: Option<Duration>,
    query_delay: Option<Duration>,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next call of `method`
    pub fn reply(&self, method: &str, reply: Reply) -> &Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Delay every update call (timeout tests)
    pub fn delay_updates(&self, delay: Duration) {
        self.state.lock().unwrap().update_delay = Some(delay);
    }

    pub fn delay_queries(&self, delay: Duration) {
        self.state.lock().unwrap().query_delay = Some(delay);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, kind: &'static str, canister: &Principal, method: &str, arg: Vec<u8>) -> Reply {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall {
            kind,
            canister: *canister,
            method: method.to_string(),
            arg,
        });
        state
            .replies
            .get_mut(method)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(TransportFailure::Failed(format!("no scripted reply for {}", method))))
    }
}

#[async_trait]
impl CanisterTransport for MockTransport {
    async fn query(&self, canister: &Principal, method: &str, arg: Vec<u8>) -> Reply {
        let delay = self.state.lock().unwrap().query_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record("query", canister, method, arg)
    }

    async fn update(&self, canister: &Principal, method: &str, arg: Vec<u8>) -> Reply {
        let delay = self.state.lock().unwrap().update_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record("update", canister, method, arg)
    }
}

/// Hands out clones of one `MockTransport` and remembers who connected
#[derive(Clone, Default)]
pub struct MockConnector {
    pub transport: MockTransport,
    pub refuse: Option<RelayError>,
    connected: Arc<Mutex<Vec<Option<Principal>>>>,
}

impl MockConnector {
    pub fn new(transport: MockTransport) -> Self {
        Self { transport, refuse: None, connected: Arc::default() }
    }

    pub fn refusing(error: RelayError) -> Self {
        Self { refuse: Some(error), ..Self::default() }
    }

    pub fn connected(&self) -> Vec<Option<Principal>> {
        self.connected.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Transport = MockTransport;

    async fn connect(&self, identity: Secp256k1Identity) -> std::result::Result<MockTransport, RelayError> {
        if let Some(err) = &self.refuse {
            return Err(err.clone());
        }
        self.connected.lock().unwrap().push(identity.sender().ok());
        Ok(self.transport.clone())
    }

    async fn connect_anonymous(&self) -> std::result::Result<MockTransport, RelayError> {
        if let Some(err) = &self.refuse {
            return Err(err.clone());
        }
        self.connected.lock().unwrap().push(None);
        Ok(self.transport.clone())
    }
}
