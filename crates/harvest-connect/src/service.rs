//! MarketplaceClient: typed operations over the marketplace canister
//!
//! Each operation makes exactly one round trip, unwraps the response
//! envelope with the absent-data policy of its endpoint, and logs any
//! failure before handing it back to the caller.

use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::ConnectConfig;
use crate::error::ConnectError;
use crate::transport::{ActorTransport, AgentActor, Method};
use crate::types::{
    CreateOfferRequest, InvestmentOffer, PlatformStats, RegisterUserRequest, UserProfile,
};
use crate::wire::{decode, RemoteEnvelope};

pub const OFFERS_FALLBACK: &str = "Failed to fetch offers";
pub const STATS_FALLBACK: &str = "Failed to fetch platform stats";
pub const CREATE_OFFER_FALLBACK: &str = "Failed to create offer";
pub const CURRENT_USER_FALLBACK: &str = "Failed to fetch current user";
pub const REGISTER_FALLBACK: &str = "Failed to register user";

struct Session {
    transport: Arc<dyn ActorTransport>,
    open: AtomicBool,
}

/// Client session with the marketplace canister.
///
/// This struct is cheaply cloneable; clones share one session, so closing
/// any of them closes all of them.
///
/// # Example
///
/// ```rust,no_run
/// use harvest_connect::{ConnectConfig, MarketplaceClient};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = MarketplaceClient::open(&ConnectConfig::default()).await?;
///
/// for offer in client.get_available_offers().await? {
///     println!("{} ({} kg available)", offer.product_name, offer.available_quantity);
/// }
///
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MarketplaceClient {
    session: Arc<Session>,
}

impl MarketplaceClient {
    /// Open a session with the replica through the IC agent.
    ///
    /// When `fetch_root_key` is set the replica root key is fetched first.
    /// A failed fetch is logged and the session is still returned.
    pub async fn open(config: &ConnectConfig) -> Result<Self, ConnectError> {
        let actor = AgentActor::new(config)?;
        info!(
            "Opening marketplace session: host={}, canister={}",
            config.host,
            actor.canister_id()
        );

        let client = Self::with_transport(Arc::new(actor));
        if config.fetch_root_key {
            client.fetch_root_key().await;
        }

        Ok(client)
    }

    /// Wrap an already constructed transport
    pub fn with_transport(transport: Arc<dyn ActorTransport>) -> Self {
        Self {
            session: Arc::new(Session {
                transport,
                open: AtomicBool::new(true),
            }),
        }
    }

    /// Fetch the replica root key. Returns whether it succeeded.
    pub async fn fetch_root_key(&self) -> bool {
        match self.session.transport.fetch_root_key().await {
            Ok(()) => {
                debug!("Replica root key fetched");
                true
            }
            Err(e) => {
                warn!(
                    "Unable to fetch root key. Check to ensure that your local replica is running: {}",
                    e
                );
                false
            }
        }
    }

    /// End the session. Later calls fail with `SessionClosed`.
    pub fn close(&self) {
        if self.session.open.swap(false, Ordering::SeqCst) {
            info!("Marketplace session closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.open.load(Ordering::SeqCst)
    }

    async fn call(&self, method: Method, args: Vec<Value>) -> Result<Value, ConnectError> {
        if !self.is_open() {
            return Err(ConnectError::SessionClosed);
        }
        self.session.transport.call(method, args).await
    }

    async fn call_envelope(
        &self,
        method: Method,
        args: Vec<Value>,
    ) -> Result<RemoteEnvelope, ConnectError> {
        let wire = self.call(method, args).await?;
        RemoteEnvelope::from_wire(wire)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Raw status string from the canister. No envelope is involved.
    pub async fn health_check(&self) -> Result<String, ConnectError> {
        let result = async {
            let wire = self.call(Method::HealthCheck, vec![]).await?;
            decode::<String>(wire)
        }
        .await;
        logged("Health check failed", result)
    }

    /// Offers currently open for investment, in canister order.
    ///
    /// Missing data under a successful envelope is an empty list.
    pub async fn get_available_offers(&self) -> Result<Vec<InvestmentOffer>, ConnectError> {
        let result = async {
            let envelope = self.call_envelope(Method::GetAvailableOffers, vec![]).await?;
            match envelope.into_optional(OFFERS_FALLBACK)? {
                Some(data) => decode::<Vec<InvestmentOffer>>(data),
                None => Ok(Vec::new()),
            }
        }
        .await;
        logged("Error fetching offers", result)
    }

    pub async fn get_platform_stats(&self) -> Result<PlatformStats, ConnectError> {
        let result = async {
            let envelope = self.call_envelope(Method::GetPlatformStats, vec![]).await?;
            decode::<PlatformStats>(envelope.into_required(STATS_FALLBACK)?)
        }
        .await;
        logged("Error fetching platform stats", result)
    }

    /// Profile of the calling principal, if registered.
    ///
    /// The payload is an optional of an optional; absence at either level
    /// is `None`.
    pub async fn get_current_user(&self) -> Result<Option<UserProfile>, ConnectError> {
        let result = async {
            let envelope = self.call_envelope(Method::GetCurrentUser, vec![]).await?;
            envelope
                .into_double_optional(CURRENT_USER_FALLBACK)?
                .map(decode::<UserProfile>)
                .transpose()
        }
        .await;
        logged("Error fetching current user", result)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Updates
    // ═══════════════════════════════════════════════════════════════════════

    pub async fn create_agricultural_offer(
        &self,
        request: &CreateOfferRequest,
    ) -> Result<InvestmentOffer, ConnectError> {
        let result = async {
            let args = vec![serde_json::to_value(request)?];
            let envelope = self
                .call_envelope(Method::CreateAgriculturalOffer, args)
                .await?;
            decode::<InvestmentOffer>(envelope.into_required(CREATE_OFFER_FALLBACK)?)
        }
        .await;

        if let Ok(offer) = &result {
            info!("Created offer {} ({})", offer.id, offer.product_name);
        }
        logged("Error creating offer", result)
    }

    pub async fn register_user(
        &self,
        request: &RegisterUserRequest,
    ) -> Result<UserProfile, ConnectError> {
        let result = async {
            let args = vec![serde_json::to_value(request)?];
            let envelope = self.call_envelope(Method::RegisterUser, args).await?;
            decode::<UserProfile>(envelope.into_required(REGISTER_FALLBACK)?)
        }
        .await;

        if let Ok(profile) = &result {
            info!("Registered {} as {}", profile.principal, profile.role);
        }
        logged("Error registering user", result)
    }
}

fn logged<T>(context: &str, result: Result<T, ConnectError>) -> Result<T, ConnectError> {
    if let Err(e) = &result {
        error!("{}: {}", context, e);
    }
    result
}
