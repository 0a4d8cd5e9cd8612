//! Harvest Connect: client-side adapter for the HarvestX marketplace canister
//!
//! This crate is the single translation boundary between the canister's wire
//! encoding (response envelopes, nested optionals, tagged variants) and plain
//! Rust values.
//!
//! # Architecture
//!
//! - **MarketplaceClient**: typed async operations, one round trip each
//! - **ActorTransport**: the network seam; `AgentActor` for a replica, `MockActor` for tests
//! - **idl**: Candid mirrors of the canister interface and their JSON projection
//! - **wire / variant**: optional unwrapping, envelope handling and tagged-union decoding
//!
//! # Example
//!
//! ```rust,no_run
//! use harvest_connect::{ConnectConfig, MarketplaceClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = MarketplaceClient::open(&ConnectConfig::default()).await?;
//!
//!     let stats = client.get_platform_stats().await?;
//!     println!("{} active offers", stats.active_offers);
//!
//!     match client.get_current_user().await? {
//!         Some(user) => println!("Signed in as {}", user.display_name),
//!         None => println!("Not registered"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod idl;
pub mod mock;
pub mod service;
pub mod transport;
pub mod types;
pub mod variant;
pub mod wire;

pub use config::ConnectConfig;
pub use error::ConnectError;
pub use service::MarketplaceClient;
pub use transport::{ActorTransport, AgentActor, CallKind, Method};
pub use types::{
    CreateOfferRequest, InvestmentOffer, PlatformStats, PrincipalText, RegisterUserRequest,
    UserProfile,
};
pub use variant::{
    label_of, LabelEncode, OfferStatus, ProductType, QualityGrade, RequestStatus, Tagged,
    TaggedEnum, UserRole, UNKNOWN_LABEL,
};
