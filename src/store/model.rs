//! Persisted records: user profiles, listings, and admin contacts.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who the user says they are. Chosen from the consult/consignment menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Buyer,
    Investor,
    ExpatBuyer,
    Owner,
    Agent,
    ForeignSeller,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Investor => "investor",
            Self::ExpatBuyer => "expat_buyer",
            Self::Owner => "owner",
            Self::Agent => "agent",
            Self::ForeignSeller => "foreign_seller",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "investor" => Ok(Self::Investor),
            "expat_buyer" => Ok(Self::ExpatBuyer),
            "owner" => Ok(Self::Owner),
            "agent" => Ok(Self::Agent),
            "foreign_seller" => Ok(Self::ForeignSeller),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a reservation once the user has answered the yes/no prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A user's accumulated conversation state, one row per LINE user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Listing names in the order they were registered, without duplicates.
    pub interest_list: Vec<String>,
    pub area_interest: Option<String>,
    pub property_type_interest: Option<String>,
    pub reservation_property: Option<String>,
    pub reservation_timestamp: Option<DateTime<FixedOffset>>,
    pub reservation_status: Option<ReservationStatus>,
    /// `true` for buying, `false` for renting; set from the requirements form.
    pub intent: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Both name and phone are on file.
    pub fn has_contact(&self) -> bool {
        non_empty(&self.name) && non_empty(&self.phone)
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Join an interest list into its stored form: `"a, b, c"`.
pub fn join_interests(interests: &[String]) -> String {
    interests.join(", ")
}

/// Split the stored comma-joined form back into names.
pub fn split_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// A partial profile write. Only `Some` fields are written; everything else in
/// the row is left untouched.
///
/// Nullable columns use `Option<Option<_>>`: `Some(None)` writes NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub interest_list: Option<Vec<String>>,
    pub area_interest: Option<String>,
    pub property_type_interest: Option<String>,
    pub reservation_property: Option<String>,
    pub reservation_timestamp: Option<Option<DateTime<FixedOffset>>>,
    pub reservation_status: Option<Option<ReservationStatus>>,
    pub intent: Option<bool>,
}

/// A property in the catalog (`house_projects`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub district: Option<String>,
    pub property_type: Option<String>,
    pub active: bool,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub usable_area: Option<String>,
    pub location: Option<String>,
    pub map_url: Option<String>,
    pub amenities: Vec<String>,
    pub promotions: Vec<String>,
    pub description: Option<String>,
}

/// Filter for catalog browsing.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    /// Matched case-insensitively as a substring of `district`.
    pub area: String,
    /// Exact property type, if any.
    pub property_type: Option<String>,
    pub limit: usize,
}

/// An admin shown in the contact carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminContact {
    pub name: String,
    pub tel: String,
    pub image_url: Option<String>,
}
