//! Candid interface of the marketplace canister
//!
//! Typed mirrors of the canister's IDL records and variants, plus the two
//! conversions the agent transport needs: JSON call arguments into Candid
//! bytes, and Candid replies into the JSON projection that [`crate::wire`]
//! unwraps (`opt` as `[]`/`[x]`, variants as single-key objects, principals
//! as text).

use candid::{CandidType, Principal};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ConnectError;
use crate::transport::Method;
use crate::variant::{OfferStatus, ProductType, QualityGrade, TaggedEnum, UserRole};

/// Conversion into the candid-JS JSON projection
pub trait ToWire {
    fn to_wire(&self) -> Value;
}

impl ToWire for String {
    fn to_wire(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: ToWire> ToWire for Option<T> {
    fn to_wire(&self) -> Value {
        match self {
            Some(inner) => Value::Array(vec![inner.to_wire()]),
            None => Value::Array(Vec::new()),
        }
    }
}

impl<T: ToWire> ToWire for Vec<T> {
    fn to_wire(&self) -> Value {
        Value::Array(self.iter().map(ToWire::to_wire).collect())
    }
}

// ============================================================================
// VARIANTS
// ============================================================================

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum IdlProductType {
    Nuts,
    Grains,
    Legumes,
    Herbs,
    Vegetables,
    Other(String),
    Fruits,
}

impl From<IdlProductType> for ProductType {
    fn from(idl: IdlProductType) -> Self {
        match idl {
            IdlProductType::Nuts => ProductType::Nuts,
            IdlProductType::Grains => ProductType::Grains,
            IdlProductType::Legumes => ProductType::Legumes,
            IdlProductType::Herbs => ProductType::Herbs,
            IdlProductType::Vegetables => ProductType::Vegetables,
            IdlProductType::Other(text) => ProductType::Other(text),
            IdlProductType::Fruits => ProductType::Fruits,
        }
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub enum IdlQualityGrade {
    Premium,
    Grade1,
    Grade2,
    Certified(String),
    Standard,
    Organic,
}

impl From<IdlQualityGrade> for QualityGrade {
    fn from(idl: IdlQualityGrade) -> Self {
        match idl {
            IdlQualityGrade::Premium => QualityGrade::Premium,
            IdlQualityGrade::Grade1 => QualityGrade::Grade1,
            IdlQualityGrade::Grade2 => QualityGrade::Grade2,
            IdlQualityGrade::Certified(text) => QualityGrade::Certified(text),
            IdlQualityGrade::Standard => QualityGrade::Standard,
            IdlQualityGrade::Organic => QualityGrade::Organic,
        }
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum IdlOfferStatus {
    Active,
    Cancelled,
    Completed,
    Expired,
}

impl From<IdlOfferStatus> for OfferStatus {
    fn from(idl: IdlOfferStatus) -> Self {
        match idl {
            IdlOfferStatus::Active => OfferStatus::Active,
            IdlOfferStatus::Cancelled => OfferStatus::Cancelled,
            IdlOfferStatus::Completed => OfferStatus::Completed,
            IdlOfferStatus::Expired => OfferStatus::Expired,
        }
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum IdlUserRole {
    Farmer,
    Guest,
    Admin,
    Investor,
}

impl From<IdlUserRole> for UserRole {
    fn from(idl: IdlUserRole) -> Self {
        match idl {
            IdlUserRole::Farmer => UserRole::Farmer,
            IdlUserRole::Guest => UserRole::Guest,
            IdlUserRole::Admin => UserRole::Admin,
            IdlUserRole::Investor => UserRole::Investor,
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct IdlOffer {
    pub id: String,
    pub status: IdlOfferStatus,
    pub updated_at: u64,
    pub total_quantity: u64,
    pub minimum_investment: u64,
    pub description: String,
    pub created_at: u64,
    pub quality_grade: IdlQualityGrade,
    pub product_name: String,
    pub product_type: IdlProductType,
    pub available_quantity: u64,
    pub price_per_kg: f64,
    pub location: String,
    pub farmer: Principal,
    pub harvest_date: String,
}

impl ToWire for IdlOffer {
    fn to_wire(&self) -> Value {
        json!({
            "id": self.id,
            "status": OfferStatus::from(self.status).to_wire(),
            "updated_at": self.updated_at,
            "total_quantity": self.total_quantity,
            "minimum_investment": self.minimum_investment,
            "description": self.description,
            "created_at": self.created_at,
            "quality_grade": QualityGrade::from(self.quality_grade.clone()).to_wire(),
            "product_name": self.product_name,
            "product_type": ProductType::from(self.product_type.clone()).to_wire(),
            "available_quantity": self.available_quantity,
            "price_per_kg": self.price_per_kg,
            "location": self.location,
            "farmer": self.farmer.to_text(),
            "harvest_date": self.harvest_date,
        })
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct IdlProfile {
    pub updated_at: u64,
    pub principal: Principal,
    pub role: IdlUserRole,
    pub created_at: u64,
    pub email: String,
    pub display_name: String,
}

impl ToWire for IdlProfile {
    fn to_wire(&self) -> Value {
        json!({
            "updated_at": self.updated_at,
            "principal": self.principal.to_text(),
            "role": UserRole::from(self.role).to_wire(),
            "created_at": self.created_at,
            "email": self.email,
            "display_name": self.display_name,
        })
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct IdlStats {
    pub total_requests: u64,
    pub total_users: u64,
    pub total_transactions: u64,
    pub total_offers: u64,
    pub active_offers: u64,
}

impl ToWire for IdlStats {
    fn to_wire(&self) -> Value {
        json!({
            "total_requests": self.total_requests,
            "total_users": self.total_users,
            "total_transactions": self.total_transactions,
            "total_offers": self.total_offers,
            "active_offers": self.active_offers,
        })
    }
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct IdlCreateOfferRequest {
    pub total_quantity: u64,
    pub minimum_investment: u64,
    pub description: String,
    pub quality_grade: IdlQualityGrade,
    pub product_name: String,
    pub product_type: IdlProductType,
    pub price_per_kg: f64,
    pub location: String,
    pub harvest_date: String,
}

#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct IdlRegisterUserRequest {
    pub role: IdlUserRole,
    pub email: String,
    pub display_name: String,
}

/// `record { data : opt T; error : opt text; success : bool }`
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq)]
pub struct IdlResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub success: bool,
}

impl<T: ToWire> ToWire for IdlResponse<T> {
    fn to_wire(&self) -> Value {
        json!({
            "success": self.success,
            "data": self.data.to_wire(),
            "error": self.error.to_wire(),
        })
    }
}

// ============================================================================
// CALL CODEC
// ============================================================================

fn single_arg<T>(method: Method, args: Vec<Value>) -> Result<T, ConnectError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(arg), None) => Ok(serde_json::from_value(arg)?),
        _ => Err(ConnectError::InvalidArgs(format!(
            "{} takes exactly one argument",
            method
        ))),
    }
}

/// Encode the JSON arguments of `method` as a Candid argument list
pub fn encode_args(method: Method, args: Vec<Value>) -> Result<Vec<u8>, ConnectError> {
    let bytes = match method {
        Method::CreateAgriculturalOffer => {
            candid::encode_one(single_arg::<IdlCreateOfferRequest>(method, args)?)?
        }
        Method::RegisterUser => {
            candid::encode_one(single_arg::<IdlRegisterUserRequest>(method, args)?)?
        }
        Method::HealthCheck
        | Method::GetAvailableOffers
        | Method::GetPlatformStats
        | Method::GetCurrentUser => {
            if !args.is_empty() {
                return Err(ConnectError::InvalidArgs(format!(
                    "{} takes no arguments",
                    method
                )));
            }
            candid::encode_args(())?
        }
    };
    Ok(bytes)
}

/// Decode the Candid reply of `method` into its JSON wire value
pub fn decode_reply(method: Method, bytes: &[u8]) -> Result<Value, ConnectError> {
    let wire = match method {
        Method::HealthCheck => candid::decode_one::<String>(bytes)?.to_wire(),
        Method::GetAvailableOffers => {
            candid::decode_one::<IdlResponse<Vec<IdlOffer>>>(bytes)?.to_wire()
        }
        Method::GetPlatformStats => candid::decode_one::<IdlResponse<IdlStats>>(bytes)?.to_wire(),
        Method::GetCurrentUser => {
            candid::decode_one::<IdlResponse<Option<IdlProfile>>>(bytes)?.to_wire()
        }
        Method::CreateAgriculturalOffer => {
            candid::decode_one::<IdlResponse<IdlOffer>>(bytes)?.to_wire()
        }
        Method::RegisterUser => candid::decode_one::<IdlResponse<IdlProfile>>(bytes)?.to_wire(),
    };
    Ok(wire)
}
