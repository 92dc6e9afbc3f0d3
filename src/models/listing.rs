use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;

pub const STATUS_AVAILABLE: &str = "available";

fn default_status() -> String {
    STATUS_AVAILABLE.to_string()
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub donor: String,
    pub quantity: String,
    pub expiry: String,
    pub location: String,
    pub status: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a create request. Identifier and timestamps are always assigned by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    pub title: String,
    pub donor: String,
    /// Free text, e.g. "5 kg" or "20 units".
    pub quantity: String,
    /// Best-before date as entered by the donor.
    pub expiry: String,
    pub location: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Shallow merge: only fields present in the body are written.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ListingUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.donor.is_none()
            && self.quantity.is_none()
            && self.expiry.is_none()
            && self.location.is_none()
            && self.status.is_none()
            && self.user_id.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: Uuid,
    pub title: String,
    pub donor: String,
    pub quantity: String,
    pub expiry: String,
    pub location: String,
    pub status: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Listing> for ListingResponse {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            donor: listing.donor.clone(),
            quantity: listing.quantity.clone(),
            expiry: listing.expiry.clone(),
            location: listing.location.clone(),
            status: listing.status.clone(),
            user_id: listing.user_id.clone(),
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

impl ListingResponse {
    pub fn is_available(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_AVAILABLE)
    }
}

/// `GET /listings` answers with one listing when `?id=` is given, otherwise the whole collection.
#[derive(Serialize, Debug, JsonSchema)]
#[serde(untagged)]
pub enum ListingLookup {
    One(ListingResponse),
    All(Vec<ListingResponse>),
}
