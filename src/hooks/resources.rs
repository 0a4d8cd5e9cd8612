/*!
 * Marketplace hooks: one task per adapter operation
 */

use futures::FutureExt;
use harvest_connect::{
    ConnectError, CreateOfferRequest, InvestmentOffer, MarketplaceClient, PlatformStats,
    RegisterUserRequest, UserProfile,
};
use std::future::Future;
use tracing::debug;

use super::fetch::{FetchTask, Fetcher};
use super::mutation::{Action, MutationTask};

pub const OFFERS_ERROR: &str = "Failed to fetch offers";
pub const STATS_ERROR: &str = "Failed to fetch stats";
pub const USER_ERROR: &str = "Failed to fetch user";
pub const HEALTH_ERROR: &str = "Health check failed";
pub const CREATE_OFFER_ERROR: &str = "Failed to create offer";
pub const REGISTER_ERROR: &str = "Failed to register user";

fn fetcher<T, F, Fut>(client: &MarketplaceClient, op: F) -> Fetcher<T>
where
    F: Fn(MarketplaceClient) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ConnectError>> + Send + 'static,
{
    let client = client.clone();
    Box::new(move || op(client.clone()).boxed())
}

fn action<Req, T, F, Fut>(client: &MarketplaceClient, op: F) -> Action<Req, T>
where
    F: Fn(MarketplaceClient, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ConnectError>> + Send + 'static,
{
    let client = client.clone();
    Box::new(move |request| op(client.clone(), request).boxed())
}

/// Healthy iff the canister answers exactly `OK` or mentions `healthy`
pub fn is_healthy(status: &str) -> bool {
    status == "OK" || status.contains("healthy")
}

/// Offers open for investment (fetches on mount)
pub fn offers(client: &MarketplaceClient) -> FetchTask<Vec<InvestmentOffer>> {
    FetchTask::new(
        "offers",
        OFFERS_ERROR,
        fetcher(client, |c| async move { c.get_available_offers().await }),
    )
}

/// Platform counters (fetches on mount)
pub fn platform_stats(client: &MarketplaceClient) -> FetchTask<PlatformStats> {
    FetchTask::new(
        "platform_stats",
        STATS_ERROR,
        fetcher(client, |c| async move { c.get_platform_stats().await }),
    )
}

/// The caller's profile; `Some(None)` once fetched means not registered
pub fn current_user(client: &MarketplaceClient) -> FetchTask<Option<UserProfile>> {
    FetchTask::new(
        "current_user",
        USER_ERROR,
        fetcher(client, |c| async move { c.get_current_user().await }),
    )
}

/// Canister health (fetches on mount). A failed call reads as unhealthy
/// rather than as an error.
pub fn health(client: &MarketplaceClient) -> FetchTask<bool> {
    FetchTask::new(
        "health",
        HEALTH_ERROR,
        fetcher(client, |c| async move {
            match c.health_check().await {
                Ok(status) => {
                    debug!("Health status: {}", status);
                    Ok(is_healthy(&status))
                }
                Err(_) => Ok(false),
            }
        }),
    )
}

pub fn create_offer(client: &MarketplaceClient) -> MutationTask<CreateOfferRequest, InvestmentOffer> {
    MutationTask::new(
        "create_offer",
        CREATE_OFFER_ERROR,
        action(client, |c, request: CreateOfferRequest| async move {
            c.create_agricultural_offer(&request).await
        }),
    )
}

pub fn register_user(client: &MarketplaceClient) -> MutationTask<RegisterUserRequest, UserProfile> {
    MutationTask::new(
        "register_user",
        REGISTER_ERROR,
        action(client, |c, request: RegisterUserRequest| async move {
            c.register_user(&request).await
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_interpretation() {
        assert!(is_healthy("OK"));
        assert!(is_healthy("canister healthy"));
        assert!(is_healthy("healthy"));
        assert!(!is_healthy("ok"));
        assert!(!is_healthy("degraded"));
        assert!(!is_healthy(""));
    }
}
