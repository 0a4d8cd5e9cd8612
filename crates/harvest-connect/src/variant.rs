//! Tagged-union wire values
//!
//! Candid variants arrive as single-key objects: `{"Nuts": null}` for plain
//! tags and `{"Other": "Spices"}` for tags that carry text. Decoding is a
//! first-match lookup over a fixed priority order and is total: anything
//! unrecognized renders as [`UNKNOWN_LABEL`].

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Label rendered for a tagged value with no recognized tag.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A closed enumeration with a single-key tagged wire form.
pub trait TaggedEnum: Sized {
    /// Tag names in decode priority order.
    const TAGS: &'static [&'static str];

    /// Build the variant for a tag in `TAGS`. `payload` is the value stored
    /// under the tag key.
    fn from_tag(tag: &str, payload: &Value) -> Option<Self>;

    /// Wire tag of this variant.
    fn tag(&self) -> &'static str;

    /// Text carried by payload-bearing variants.
    fn payload(&self) -> Option<&str> {
        None
    }

    /// Display label: the carried text for payload variants, the tag otherwise.
    fn label(&self) -> String {
        self.payload().unwrap_or(self.tag()).to_string()
    }

    fn to_wire(&self) -> Value {
        let payload = self
            .payload()
            .map_or(Value::Null, |p| Value::String(p.to_string()));
        let mut fields = Map::new();
        fields.insert(self.tag().to_string(), payload);
        Value::Object(fields)
    }

    fn from_wire(wire: &Value) -> Option<Self> {
        let fields = wire.as_object()?;
        let tag = Self::TAGS.iter().find(|tag| fields.contains_key(**tag))?;
        Self::from_tag(tag, &fields[*tag])
    }
}

/// Enumerations that can be built from a free-form label. Never fails:
/// unrecognized labels land on the enumeration's catch-all variant.
pub trait LabelEncode: TaggedEnum {
    fn from_label(label: &str) -> Self;
}

/// Decode a raw tagged value straight to its display label.
pub fn label_of<T: TaggedEnum>(wire: &Value) -> String {
    T::from_wire(wire)
        .map(|v| v.label())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

fn payload_text(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A tagged value as received from the canister. Unrecognized tags are
/// kept verbatim so they survive a round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Tagged<T> {
    Known(T),
    Unknown(Value),
}

impl<T: TaggedEnum> Tagged<T> {
    pub fn from_wire(wire: Value) -> Self {
        match T::from_wire(&wire) {
            Some(v) => Tagged::Known(v),
            None => Tagged::Unknown(wire),
        }
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Tagged::Known(v) => Some(v),
            Tagged::Unknown(_) => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Tagged::Known(v) => v.label(),
            Tagged::Unknown(_) => UNKNOWN_LABEL.to_string(),
        }
    }

    pub fn to_wire(&self) -> Value {
        match self {
            Tagged::Known(v) => v.to_wire(),
            Tagged::Unknown(raw) => raw.clone(),
        }
    }
}

impl<T> From<T> for Tagged<T> {
    fn from(value: T) -> Self {
        Tagged::Known(value)
    }
}

impl<T: TaggedEnum> fmt::Display for Tagged<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl<T: TaggedEnum> Serialize for Tagged<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de, T: TaggedEnum> Deserialize<'de> for Tagged<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Tagged::from_wire(Value::deserialize(deserializer)?))
    }
}

/// Strict serde for the closed enums: the wire form on the way out, and a
/// decode error (rather than a fallback) for unknown tags on the way in.
macro_rules! tagged_serde {
    ($ty:ident) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.to_wire().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let wire = Value::deserialize(deserializer)?;
                $ty::from_wire(&wire).ok_or_else(|| {
                    de::Error::custom(format!(
                        "unrecognized {} variant: {}",
                        stringify!($ty),
                        wire
                    ))
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.label())
            }
        }
    };
}

// ============================================================================
// PRODUCT TYPE
// ============================================================================

/// Product category of an offer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductType {
    Nuts,
    Grains,
    Legumes,
    Herbs,
    Vegetables,
    Fruits,
    Other(String),
}

impl TaggedEnum for ProductType {
    const TAGS: &'static [&'static str] = &[
        "Nuts",
        "Grains",
        "Legumes",
        "Herbs",
        "Vegetables",
        "Fruits",
        "Other",
    ];

    fn from_tag(tag: &str, payload: &Value) -> Option<Self> {
        Some(match tag {
            "Nuts" => ProductType::Nuts,
            "Grains" => ProductType::Grains,
            "Legumes" => ProductType::Legumes,
            "Herbs" => ProductType::Herbs,
            "Vegetables" => ProductType::Vegetables,
            "Fruits" => ProductType::Fruits,
            "Other" => ProductType::Other(payload_text(payload)),
            _ => return None,
        })
    }

    fn tag(&self) -> &'static str {
        match self {
            ProductType::Nuts => "Nuts",
            ProductType::Grains => "Grains",
            ProductType::Legumes => "Legumes",
            ProductType::Herbs => "Herbs",
            ProductType::Vegetables => "Vegetables",
            ProductType::Fruits => "Fruits",
            ProductType::Other(_) => "Other",
        }
    }

    fn payload(&self) -> Option<&str> {
        match self {
            ProductType::Other(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl LabelEncode for ProductType {
    fn from_label(label: &str) -> Self {
        match label {
            "Nuts" => ProductType::Nuts,
            "Grains" => ProductType::Grains,
            "Legumes" => ProductType::Legumes,
            "Herbs" => ProductType::Herbs,
            "Vegetables" => ProductType::Vegetables,
            "Fruits" => ProductType::Fruits,
            other => ProductType::Other(other.to_string()),
        }
    }
}

tagged_serde!(ProductType);

// ============================================================================
// QUALITY GRADE
// ============================================================================

/// Quality grade of the produce
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QualityGrade {
    Premium,
    Grade1,
    Grade2,
    Standard,
    Organic,
    /// Certification body or scheme name
    Certified(String),
}

impl TaggedEnum for QualityGrade {
    const TAGS: &'static [&'static str] = &[
        "Premium",
        "Grade1",
        "Grade2",
        "Standard",
        "Organic",
        "Certified",
    ];

    fn from_tag(tag: &str, payload: &Value) -> Option<Self> {
        Some(match tag {
            "Premium" => QualityGrade::Premium,
            "Grade1" => QualityGrade::Grade1,
            "Grade2" => QualityGrade::Grade2,
            "Standard" => QualityGrade::Standard,
            "Organic" => QualityGrade::Organic,
            "Certified" => QualityGrade::Certified(payload_text(payload)),
            _ => return None,
        })
    }

    fn tag(&self) -> &'static str {
        match self {
            QualityGrade::Premium => "Premium",
            QualityGrade::Grade1 => "Grade1",
            QualityGrade::Grade2 => "Grade2",
            QualityGrade::Standard => "Standard",
            QualityGrade::Organic => "Organic",
            QualityGrade::Certified(_) => "Certified",
        }
    }

    fn payload(&self) -> Option<&str> {
        match self {
            QualityGrade::Certified(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl LabelEncode for QualityGrade {
    fn from_label(label: &str) -> Self {
        match label {
            "Premium" => QualityGrade::Premium,
            "Grade1" => QualityGrade::Grade1,
            "Grade2" => QualityGrade::Grade2,
            "Standard" => QualityGrade::Standard,
            "Organic" => QualityGrade::Organic,
            other => QualityGrade::Certified(other.to_string()),
        }
    }
}

tagged_serde!(QualityGrade);

// ============================================================================
// OFFER STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferStatus {
    Active,
    Cancelled,
    Completed,
    Expired,
}

impl TaggedEnum for OfferStatus {
    const TAGS: &'static [&'static str] = &["Active", "Cancelled", "Completed", "Expired"];

    fn from_tag(tag: &str, _payload: &Value) -> Option<Self> {
        match tag {
            "Active" => Some(OfferStatus::Active),
            "Cancelled" => Some(OfferStatus::Cancelled),
            "Completed" => Some(OfferStatus::Completed),
            "Expired" => Some(OfferStatus::Expired),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            OfferStatus::Active => "Active",
            OfferStatus::Cancelled => "Cancelled",
            OfferStatus::Completed => "Completed",
            OfferStatus::Expired => "Expired",
        }
    }
}

tagged_serde!(OfferStatus);

// ============================================================================
// REQUEST STATUS
// ============================================================================

/// Status of an investment request against an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Expired,
}

impl TaggedEnum for RequestStatus {
    const TAGS: &'static [&'static str] =
        &["Pending", "Accepted", "Rejected", "Cancelled", "Expired"];

    fn from_tag(tag: &str, _payload: &Value) -> Option<Self> {
        match tag {
            "Pending" => Some(RequestStatus::Pending),
            "Accepted" => Some(RequestStatus::Accepted),
            "Rejected" => Some(RequestStatus::Rejected),
            "Cancelled" => Some(RequestStatus::Cancelled),
            "Expired" => Some(RequestStatus::Expired),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Cancelled => "Cancelled",
            RequestStatus::Expired => "Expired",
        }
    }
}

tagged_serde!(RequestStatus);

// ============================================================================
// USER ROLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    Farmer,
    Investor,
    Admin,
    Guest,
}

impl TaggedEnum for UserRole {
    const TAGS: &'static [&'static str] = &["Farmer", "Investor", "Admin", "Guest"];

    fn from_tag(tag: &str, _payload: &Value) -> Option<Self> {
        match tag {
            "Farmer" => Some(UserRole::Farmer),
            "Investor" => Some(UserRole::Investor),
            "Admin" => Some(UserRole::Admin),
            "Guest" => Some(UserRole::Guest),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            UserRole::Farmer => "Farmer",
            UserRole::Investor => "Investor",
            UserRole::Admin => "Admin",
            UserRole::Guest => "Guest",
        }
    }
}

impl LabelEncode for UserRole {
    // No payload-bearing tag; anything unrecognized is a guest.
    fn from_label(label: &str) -> Self {
        match label {
            "Farmer" => UserRole::Farmer,
            "Investor" => UserRole::Investor,
            "Admin" => UserRole::Admin,
            _ => UserRole::Guest,
        }
    }
}

tagged_serde!(UserRole);
