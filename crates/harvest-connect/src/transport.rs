//! Transport seam between the marketplace client and the canister
//!
//! [`ActorTransport`] is the only thing the client knows about the network.
//! [`AgentActor`] talks to a replica through `ic-agent`;
//! [`crate::mock::MockActor`] replays scripted responses in tests.

use async_trait::async_trait;
use ic_agent::export::Principal;
use ic_agent::{Agent, AgentError};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::config::ConnectConfig;
use crate::error::ConnectError;
use crate::idl;

/// Whether a procedure is a read-only query or a state-changing update call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Query,
    Update,
}

/// Remote procedures exposed by the marketplace canister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    HealthCheck,
    GetAvailableOffers,
    GetPlatformStats,
    GetCurrentUser,
    CreateAgriculturalOffer,
    RegisterUser,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::HealthCheck,
        Method::GetAvailableOffers,
        Method::GetPlatformStats,
        Method::GetCurrentUser,
        Method::CreateAgriculturalOffer,
        Method::RegisterUser,
    ];

    /// Candid method name
    pub fn name(self) -> &'static str {
        match self {
            Method::HealthCheck => "health_check",
            Method::GetAvailableOffers => "get_available_offers",
            Method::GetPlatformStats => "get_platform_stats",
            Method::GetCurrentUser => "get_current_user",
            Method::CreateAgriculturalOffer => "create_agricultural_offer",
            Method::RegisterUser => "register_user",
        }
    }

    pub fn kind(self) -> CallKind {
        match self {
            Method::CreateAgriculturalOffer | Method::RegisterUser => CallKind::Update,
            _ => CallKind::Query,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A session with the remote actor.
///
/// Implementations perform exactly one round trip per `call` and never
/// retry; the client above relies on that.
#[async_trait]
pub trait ActorTransport: Send + Sync {
    /// Fetch the replica root key (only meaningful against a local replica)
    async fn fetch_root_key(&self) -> Result<(), ConnectError>;

    /// Invoke `method` with positional candid arguments in their JSON form
    /// and return the raw wire value.
    async fn call(&self, method: Method, args: Vec<Value>) -> Result<Value, ConnectError>;
}

/// Transport to a replica through the IC agent.
///
/// Arguments are Candid-encoded from their JSON form and replies are
/// projected back into JSON by [`crate::idl`]. Queries are a single
/// read; updates submit the call and wait for its certified reply.
#[derive(Clone)]
pub struct AgentActor {
    agent: Agent,
    canister_id: Principal,
    timeout: Duration,
}

impl AgentActor {
    /// Build a transport from validated settings. No network traffic happens here.
    pub fn new(config: &ConnectConfig) -> Result<Self, ConnectError> {
        config.validate()?;

        let canister_id = Principal::from_text(config.canister_id.trim()).map_err(|e| {
            ConnectError::InvalidConfig(format!("canister id '{}': {}", config.canister_id, e))
        })?;

        let agent = Agent::builder()
            .with_url(config.host.as_str())
            .build()
            .map_err(|e| ConnectError::InvalidConfig(format!("host '{}': {}", config.host, e)))?;

        Ok(Self {
            agent,
            canister_id,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn canister_id(&self) -> String {
        self.canister_id.to_text()
    }

    async fn round_trip(&self, method: Method, arg: Vec<u8>) -> Result<Vec<u8>, AgentError> {
        match method.kind() {
            CallKind::Query => {
                self.agent
                    .query(&self.canister_id, method.name())
                    .with_arg(arg)
                    .call()
                    .await
            }
            CallKind::Update => {
                self.agent
                    .update(&self.canister_id, method.name())
                    .with_arg(arg)
                    .call_and_wait()
                    .await
            }
        }
    }
}

#[async_trait]
impl ActorTransport for AgentActor {
    async fn fetch_root_key(&self) -> Result<(), ConnectError> {
        debug!("Fetching root key from replica");
        self.agent
            .fetch_root_key()
            .await
            .map_err(|e| ConnectError::Transport(e.to_string()))
    }

    async fn call(&self, method: Method, args: Vec<Value>) -> Result<Value, ConnectError> {
        debug!("Calling {} ({:?}) on {}", method, method.kind(), self.canister_id);

        let arg = idl::encode_args(method, args)?;
        let reply = tokio::time::timeout(self.timeout, self.round_trip(method, arg))
            .await
            .map_err(|_| {
                ConnectError::Transport(format!(
                    "{} timed out after {}s",
                    method,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| ConnectError::Transport(e.to_string()))?;

        idl::decode_reply(method, &reply)
    }
}
