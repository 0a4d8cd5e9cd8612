/*!
 * Dashboard view models
 *
 * Pure functions from hook snapshots to what the investor and farmer
 * dashboards display. Nothing here performs I/O.
 */

use chrono::DateTime;
use harvest_connect::{InvestmentOffer, PlatformStats, UserProfile};

use crate::hooks::FetchState;

/// Number of active offers featured on the investor dashboard
pub const FEATURED_LIMIT: usize = 3;

/// Characters of a principal shown before it is elided
const PRINCIPAL_PREFIX: usize = 10;

// ============================================================================
// PANELS
// ============================================================================

/// What a dashboard section shows for one hook
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T: Clone> Panel<T> {
    /// An error always wins; a hook with no value yet reads as loading.
    pub fn from_state(state: &FetchState<T>) -> Self {
        if let Some(ref error) = state.error {
            return Panel::Failed(error.clone());
        }
        match (&state.value, state.loading) {
            (Some(value), false) => Panel::Ready(value.clone()),
            _ => Panel::Loading,
        }
    }
}

impl<T> Panel<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Panel<U> {
        match self {
            Panel::Loading => Panel::Loading,
            Panel::Failed(e) => Panel::Failed(e),
            Panel::Ready(value) => Panel::Ready(f(value)),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Panel::Loading)
    }
}

// ============================================================================
// OFFER ROWS
// ============================================================================

/// One offer as displayed in a listing
#[derive(Debug, Clone, PartialEq)]
pub struct OfferRow {
    pub id: String,
    pub product: String,
    pub product_type: String,
    pub quality: String,
    pub status: String,
    pub location: String,
    pub farmer: String,
    pub price_per_kg: f64,
    pub available_quantity: u64,
    pub total_quantity: u64,
    pub minimum_investment: u64,
    pub harvest_date: String,
    pub listed_on: String,
}

impl OfferRow {
    pub fn from_offer(offer: &InvestmentOffer) -> Self {
        Self {
            id: offer.id.clone(),
            product: offer.product_name.clone(),
            product_type: offer.product_type.label(),
            quality: offer.quality_grade.label(),
            status: offer.status.label(),
            location: offer.location.clone(),
            farmer: short_principal(&offer.farmer),
            price_per_kg: offer.price_per_kg,
            available_quantity: offer.available_quantity,
            total_quantity: offer.total_quantity,
            minimum_investment: offer.minimum_investment,
            harvest_date: offer.harvest_date.clone(),
            listed_on: format_timestamp(offer.created_at),
        }
    }
}

/// Shorten a principal for display: `abcde-fghi...`. The marker is
/// always appended, even when the principal is already short.
pub fn short_principal(principal: &str) -> String {
    let prefix: String = principal.chars().take(PRINCIPAL_PREFIX).collect();
    format!("{}...", prefix)
}

/// Render a canister timestamp (nanoseconds since the epoch) as a date
pub fn format_timestamp(nanos: u64) -> String {
    match i64::try_from(nanos) {
        Ok(nanos) => DateTime::from_timestamp_nanos(nanos)
            .format("%Y-%m-%d")
            .to_string(),
        Err(_) => "-".to_string(),
    }
}

// ============================================================================
// INVESTOR DASHBOARD
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct InvestorDashboard {
    /// Leading active offers, in canister order
    pub featured: Panel<Vec<OfferRow>>,
    pub stats: Panel<PlatformStats>,
    pub healthy: Panel<bool>,
}

impl InvestorDashboard {
    pub fn build(
        offers: &FetchState<Vec<InvestmentOffer>>,
        stats: &FetchState<PlatformStats>,
        health: &FetchState<bool>,
    ) -> Self {
        let featured = Panel::from_state(offers).map(|offers| {
            offers
                .iter()
                .filter(|o| o.is_active())
                .take(FEATURED_LIMIT)
                .map(OfferRow::from_offer)
                .collect()
        });

        Self {
            featured,
            stats: Panel::from_state(stats),
            healthy: Panel::from_state(health),
        }
    }
}

// ============================================================================
// FARMER DASHBOARD
// ============================================================================

/// A farmer's own listings and their totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmerListings {
    pub rows: Vec<OfferRow>,
    pub active_offers: usize,
    pub total_quantity: u64,
    pub available_quantity: u64,
}

impl FarmerListings {
    /// Offers whose farmer is `user`. No user means no listings.
    pub fn for_user(user: Option<&UserProfile>, offers: &[InvestmentOffer]) -> Self {
        let Some(user) = user else {
            return Self::default();
        };

        let owned: Vec<&InvestmentOffer> = offers
            .iter()
            .filter(|o| o.farmer == user.principal)
            .collect();

        Self {
            rows: owned.iter().map(|o| OfferRow::from_offer(o)).collect(),
            active_offers: owned.iter().filter(|o| o.is_active()).count(),
            total_quantity: owned
                .iter()
                .fold(0u64, |sum, o| sum.saturating_add(o.total_quantity)),
            available_quantity: owned
                .iter()
                .fold(0u64, |sum, o| sum.saturating_add(o.available_quantity)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FarmerDashboard {
    pub profile: Panel<Option<UserProfile>>,
    pub listings: Panel<FarmerListings>,
}

impl FarmerDashboard {
    pub fn build(
        user: &FetchState<Option<UserProfile>>,
        offers: &FetchState<Vec<InvestmentOffer>>,
    ) -> Self {
        let profile = Panel::from_state(user);
        let offers = Panel::from_state(offers);
        let listings = match (&profile, &offers) {
            (Panel::Failed(e), _) | (_, Panel::Failed(e)) => Panel::Failed(e.clone()),
            (Panel::Loading, _) | (_, Panel::Loading) => Panel::Loading,
            (Panel::Ready(user), Panel::Ready(offers)) => {
                Panel::Ready(FarmerListings::for_user(user.as_ref(), offers))
            }
        };

        Self { profile, listings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Phase;
    use harvest_connect::{OfferStatus, ProductType, QualityGrade, Tagged, UserRole};
    use serde_json::json;

    fn offer(
        id: &str,
        status: OfferStatus,
        farmer: &str,
        total: u64,
        available: u64,
    ) -> InvestmentOffer {
        InvestmentOffer {
            id: id.to_string(),
            status: Tagged::Known(status),
            created_at: 1_700_000_000_000_000_000,
            updated_at: 1_700_000_000_000_000_000,
            total_quantity: total,
            available_quantity: available,
            minimum_investment: 100,
            price_per_kg: 4.0,
            description: "Test crop".to_string(),
            product_name: "Cashews".to_string(),
            product_type: Tagged::Known(ProductType::Nuts),
            quality_grade: Tagged::Known(QualityGrade::Grade1),
            location: "Mtwara".to_string(),
            farmer: farmer.to_string(),
            harvest_date: "2026-12-01".to_string(),
        }
    }

    fn farmer(principal: &str) -> UserProfile {
        UserProfile {
            principal: principal.to_string(),
            role: Tagged::Known(UserRole::Farmer),
            display_name: "Neema".to_string(),
            email: "neema@example.com".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn ready<T>(value: T) -> FetchState<T> {
        FetchState {
            value: Some(value),
            loading: false,
            error: None,
            phase: Phase::Ready,
        }
    }

    #[test]
    fn test_panel_from_state() {
        assert_eq!(Panel::<u32>::from_state(&FetchState::default()), Panel::Loading);
        assert_eq!(Panel::from_state(&ready(5u32)), Panel::Ready(5));

        let failed = FetchState {
            value: Some(5u32),
            loading: false,
            error: Some("boom".to_string()),
            phase: Phase::Failed,
        };
        assert_eq!(Panel::from_state(&failed), Panel::Failed("boom".to_string()));

        let refetching = FetchState {
            value: Some(5u32),
            loading: true,
            error: None,
            phase: Phase::Loading,
        };
        assert!(Panel::from_state(&refetching).is_loading());
    }

    #[test]
    fn test_offer_row_labels() {
        let mut o = offer("o-1", OfferStatus::Active, "2vxsx-fae-very-long-principal", 10, 5);
        o.product_type = Tagged::from_wire(json!({"Other": "Spices"}));
        let row = OfferRow::from_offer(&o);

        assert_eq!(row.product_type, "Spices");
        assert_eq!(row.quality, "Grade1");
        assert_eq!(row.status, "Active");
        assert_eq!(row.farmer, "2vxsx-fae-...");
        assert_eq!(row.listed_on, "2023-11-14");
    }

    #[test]
    fn test_short_principal_always_marks_truncation() {
        assert_eq!(short_principal("aaaaa-aa"), "aaaaa-aa...");
        assert_eq!(short_principal(""), "...");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(u64::MAX), "-");
        assert_eq!(format_timestamp(0), "1970-01-01");
    }

    #[test]
    fn test_investor_featured_is_leading_active_offers() {
        let offers = vec![
            offer("o-1", OfferStatus::Active, "f", 1, 1),
            offer("o-2", OfferStatus::Expired, "f", 1, 1),
            offer("o-3", OfferStatus::Active, "f", 1, 1),
            offer("o-4", OfferStatus::Active, "f", 1, 1),
            offer("o-5", OfferStatus::Active, "f", 1, 1),
        ];
        let dashboard = InvestorDashboard::build(
            &ready(offers),
            &ready(PlatformStats::default()),
            &ready(true),
        );

        let ids: Vec<String> = dashboard
            .featured
            .ready()
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(ids, vec!["o-1", "o-3", "o-4"]);
        assert_eq!(dashboard.healthy, Panel::Ready(true));
    }

    #[test]
    fn test_farmer_listings_filter_by_principal() {
        let offers = vec![
            offer("o-1", OfferStatus::Active, "me", 100, 40),
            offer("o-2", OfferStatus::Completed, "me", 50, 0),
            offer("o-3", OfferStatus::Active, "someone-else", 70, 70),
        ];
        let dashboard = FarmerDashboard::build(&ready(Some(farmer("me"))), &ready(offers));

        let listings = dashboard.listings.ready().unwrap();
        assert_eq!(listings.rows.len(), 2);
        assert_eq!(listings.active_offers, 1);
        assert_eq!(listings.total_quantity, 150);
        assert_eq!(listings.available_quantity, 40);
    }

    #[test]
    fn test_farmer_totals_saturate_instead_of_overflowing() {
        let offers = vec![
            offer("o-1", OfferStatus::Active, "me", u64::MAX, u64::MAX),
            offer("o-2", OfferStatus::Active, "me", 1, 1),
        ];
        let listings = FarmerListings::for_user(Some(&farmer("me")), &offers);
        assert_eq!(listings.total_quantity, u64::MAX);
        assert_eq!(listings.available_quantity, u64::MAX);
    }

    #[test]
    fn test_farmer_without_user_has_no_listings() {
        let offers = vec![offer("o-1", OfferStatus::Active, "me", 100, 40)];
        let dashboard = FarmerDashboard::build(&ready(None), &ready(offers));
        assert_eq!(dashboard.listings, Panel::Ready(FarmerListings::default()));
    }

    #[test]
    fn test_farmer_user_error_is_shown() {
        let user = FetchState {
            value: None,
            loading: false,
            error: Some("Failed to fetch user".to_string()),
            phase: Phase::Failed,
        };
        let dashboard = FarmerDashboard::build(&user, &ready(vec![]));
        assert_eq!(
            dashboard.listings,
            Panel::Failed("Failed to fetch user".to_string())
        );
    }
}
