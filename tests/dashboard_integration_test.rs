/*!
 * Integration tests for the investor and farmer dashboards
 *
 * Dashboards are built from live hook snapshots, with the hooks fetching
 * through a MockActor-backed client.
 */

use harvest_connect::mock::MockActor;
use harvest_connect::{MarketplaceClient, Method};
use harvestx::dashboard::{FarmerDashboard, FarmerListings, InvestorDashboard, Panel};
use harvestx::hooks;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Notify;

const FARMER: &str = "rwlgt-iiaaa-aaaaa-aaaaa-cai";

fn client_with(mock: &MockActor) -> MarketplaceClient {
    MarketplaceClient::with_transport(Arc::new(mock.clone()))
}

fn offer(id: &str, status: &str, farmer: &str, available: u64) -> Value {
    let mut status_wire = serde_json::Map::new();
    status_wire.insert(status.to_string(), Value::Null);
    json!({
        "id": id,
        "status": status_wire,
        "created_at": "1700000000000000000",
        "updated_at": "1700000000000000000",
        "total_quantity": 1000,
        "available_quantity": available,
        "minimum_investment": 100,
        "price_per_kg": 2.5,
        "description": "Arabica",
        "product_name": "Coffee",
        "product_type": {"Other": "Coffee"},
        "quality_grade": {"Premium": null},
        "location": "Arusha",
        "farmer": farmer,
        "harvest_date": "2026-09-15"
    })
}

fn marketplace(mock: &MockActor) {
    let offers = vec![
        offer("o-1", "Active", FARMER, 400),
        offer("o-2", "Completed", FARMER, 0),
        offer("o-3", "Active", "other-farmer", 1000),
        offer("o-4", "Active", FARMER, 900),
        offer("o-5", "Active", "other-farmer", 250),
    ];
    mock.respond(
        Method::GetAvailableOffers,
        json!({"success": true, "data": [offers], "error": []}),
    );
    mock.respond(
        Method::GetPlatformStats,
        json!({
            "success": true,
            "data": [{
                "total_users": 42,
                "total_offers": 5,
                "active_offers": 4,
                "total_requests": 7,
                "total_transactions": 3
            }],
            "error": []
        }),
    );
    mock.respond(Method::HealthCheck, json!("OK"));
}

fn farmer_profile() -> Value {
    json!({
        "principal": FARMER,
        "role": {"Farmer": null},
        "display_name": "Baraka",
        "email": "baraka@example.com",
        "created_at": 0,
        "updated_at": 0
    })
}

#[tokio::test]
async fn test_investor_dashboard_from_hooks() {
    let mock = MockActor::new();
    marketplace(&mock);
    let client = client_with(&mock);

    let offers = Arc::new(hooks::offers(&client));
    let stats = Arc::new(hooks::platform_stats(&client));
    let health = Arc::new(hooks::health(&client));
    offers.mount();
    stats.mount();
    health.mount();

    let (offers, stats, health) = tokio::join!(offers.settled(), stats.settled(), health.settled());
    let dashboard = InvestorDashboard::build(&offers, &stats, &health);

    let featured: Vec<&str> = dashboard
        .featured
        .ready()
        .unwrap()
        .iter()
        .map(|row| row.id.as_str())
        .collect();
    assert_eq!(featured, vec!["o-1", "o-3", "o-4"]);
    assert_eq!(dashboard.stats.ready().unwrap().total_users, 42);
    assert_eq!(dashboard.healthy, Panel::Ready(true));
}

#[tokio::test]
async fn test_investor_dashboard_loading_before_results() {
    let mock = MockActor::new();
    let gate = Arc::new(Notify::new());
    mock.respond_when(
        Method::GetAvailableOffers,
        gate.clone(),
        json!({"success": true, "data": [[]], "error": []}),
    );
    marketplace_stats_only(&mock);
    let client = client_with(&mock);

    let offers = Arc::new(hooks::offers(&client));
    let stats = Arc::new(hooks::platform_stats(&client));
    let health = Arc::new(hooks::health(&client));
    offers.mount();
    stats.mount();
    health.mount();

    let stats_state = stats.settled().await;
    let health_state = health.settled().await;
    let dashboard = InvestorDashboard::build(&offers.snapshot(), &stats_state, &health_state);
    assert!(dashboard.featured.is_loading());
    assert!(dashboard.stats.ready().is_some());

    gate.notify_one();
    let offers_state = offers.settled().await;
    let dashboard = InvestorDashboard::build(&offers_state, &stats_state, &health_state);
    assert_eq!(dashboard.featured, Panel::Ready(vec![]));
}

fn marketplace_stats_only(mock: &MockActor) {
    mock.respond(
        Method::GetPlatformStats,
        json!({
            "success": true,
            "data": [{
                "total_users": 1,
                "total_offers": 0,
                "active_offers": 0,
                "total_requests": 0,
                "total_transactions": 0
            }],
            "error": []
        }),
    );
    mock.fail(Method::HealthCheck, "connection refused");
}

#[tokio::test]
async fn test_investor_dashboard_offer_error() {
    let mock = MockActor::new();
    mock.fail(Method::GetAvailableOffers, "connection refused");
    marketplace_stats_only(&mock);
    let client = client_with(&mock);

    let offers = Arc::new(hooks::offers(&client));
    let stats = Arc::new(hooks::platform_stats(&client));
    let health = Arc::new(hooks::health(&client));
    offers.mount();
    stats.mount();
    health.mount();

    let (offers, stats, health) = tokio::join!(offers.settled(), stats.settled(), health.settled());
    let dashboard = InvestorDashboard::build(&offers, &stats, &health);

    match dashboard.featured {
        Panel::Failed(message) => assert!(message.contains("connection refused")),
        other => panic!("expected failed panel, got {:?}", other),
    }
    assert_eq!(dashboard.healthy, Panel::Ready(false));
}

#[tokio::test]
async fn test_farmer_dashboard_lists_own_offers() {
    let mock = MockActor::new();
    marketplace(&mock);
    mock.respond(
        Method::GetCurrentUser,
        json!({"success": true, "data": [[farmer_profile()]], "error": []}),
    );
    let client = client_with(&mock);

    let user = Arc::new(hooks::current_user(&client));
    let offers = Arc::new(hooks::offers(&client));
    user.mount();
    offers.mount();

    let (user, offers) = tokio::join!(user.settled(), offers.settled());
    let dashboard = FarmerDashboard::build(&user, &offers);

    let profile = dashboard.profile.ready().unwrap().as_ref().unwrap();
    assert_eq!(profile.display_name, "Baraka");
    assert!(profile.is_farmer());

    let listings = dashboard.listings.ready().unwrap();
    let ids: Vec<&str> = listings.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["o-1", "o-2", "o-4"]);
    assert_eq!(listings.active_offers, 2);
    assert_eq!(listings.total_quantity, 3000);
    assert_eq!(listings.available_quantity, 1300);
    assert_eq!(listings.rows[0].farmer, "rwlgt-iiaa...");
}

#[tokio::test]
async fn test_farmer_dashboard_unregistered_user() {
    let mock = MockActor::new();
    marketplace(&mock);
    mock.respond(
        Method::GetCurrentUser,
        json!({"success": true, "data": [], "error": []}),
    );
    let client = client_with(&mock);

    let user = Arc::new(hooks::current_user(&client));
    let offers = Arc::new(hooks::offers(&client));
    user.mount();
    offers.mount();

    let (user, offers) = tokio::join!(user.settled(), offers.settled());
    let dashboard = FarmerDashboard::build(&user, &offers);

    assert_eq!(dashboard.profile, Panel::Ready(None));
    assert_eq!(dashboard.listings, Panel::Ready(FarmerListings::default()));
}
