//! Marketplace records exchanged with the canister

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::variant::{OfferStatus, ProductType, QualityGrade, Tagged, UserRole};

/// Principal in its textual form (e.g. `"2vxsx-fae"`)
pub type PrincipalText = String;

/// Accept a `nat64` as either a JSON number or a decimal string.
///
/// The JavaScript projection of candid carries `nat64` as `bigint`, which
/// bridges usually render as strings to avoid precision loss.
fn nat64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("nat64 out of range: {}", n))),
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|e| D::Error::custom(format!("invalid nat64 '{}': {}", s, e))),
        other => Err(D::Error::custom(format!("expected nat64, got {}", other))),
    }
}

/// An offer listed by a farmer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentOffer {
    pub id: String,
    pub status: Tagged<OfferStatus>,
    #[serde(deserialize_with = "nat64")]
    pub created_at: u64,
    #[serde(deserialize_with = "nat64")]
    pub updated_at: u64,
    /// Total quantity in kilograms
    #[serde(deserialize_with = "nat64")]
    pub total_quantity: u64,
    #[serde(deserialize_with = "nat64")]
    pub available_quantity: u64,
    #[serde(deserialize_with = "nat64")]
    pub minimum_investment: u64,
    pub price_per_kg: f64,
    pub description: String,
    pub product_name: String,
    pub product_type: Tagged<ProductType>,
    pub quality_grade: Tagged<QualityGrade>,
    pub location: String,
    pub farmer: PrincipalText,
    pub harvest_date: String,
}

impl InvestmentOffer {
    pub fn is_active(&self) -> bool {
        self.status.known() == Some(&OfferStatus::Active)
    }

    /// Value of the remaining stock at the asking price
    pub fn available_value(&self) -> f64 {
        self.available_quantity as f64 * self.price_per_kg
    }
}

/// A registered marketplace participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub principal: PrincipalText,
    pub role: Tagged<UserRole>,
    pub display_name: String,
    pub email: String,
    #[serde(deserialize_with = "nat64")]
    pub created_at: u64,
    #[serde(deserialize_with = "nat64")]
    pub updated_at: u64,
}

impl UserProfile {
    pub fn is_farmer(&self) -> bool {
        self.role.known() == Some(&UserRole::Farmer)
    }
}

/// Aggregate counters for the whole platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    #[serde(deserialize_with = "nat64")]
    pub total_users: u64,
    #[serde(deserialize_with = "nat64")]
    pub total_offers: u64,
    #[serde(deserialize_with = "nat64")]
    pub active_offers: u64,
    #[serde(deserialize_with = "nat64")]
    pub total_requests: u64,
    #[serde(deserialize_with = "nat64")]
    pub total_transactions: u64,
}

/// Arguments of `create_agricultural_offer`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOfferRequest {
    pub product_name: String,
    pub product_type: ProductType,
    pub quality_grade: QualityGrade,
    pub total_quantity: u64,
    pub minimum_investment: u64,
    pub price_per_kg: f64,
    pub location: String,
    pub harvest_date: String,
    pub description: String,
}

/// Arguments of `register_user`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterUserRequest {
    pub role: UserRole,
    pub email: String,
    pub display_name: String,
}
