use crate::client::{ClientError, ListingApi};
use crate::models::listing::{ListingRequest, ListingResponse, ListingUpdateRequest, STATUS_AVAILABLE};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this listing?";

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// The fields of the create and edit dialogs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Validate)]
pub struct ListingForm {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub donor: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub quantity: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub expiry: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,
}

impl ListingForm {
    /// Prefills the edit dialog from a listing.
    pub fn from_listing(listing: &ListingResponse) -> Self {
        Self {
            title: listing.title.clone(),
            donor: listing.donor.clone(),
            quantity: listing.quantity.clone(),
            expiry: listing.expiry.clone(),
            location: listing.location.clone(),
        }
    }

    fn to_create_request(&self, user_id: &str) -> ListingRequest {
        ListingRequest {
            title: self.title.clone(),
            donor: self.donor.clone(),
            quantity: self.quantity.clone(),
            expiry: self.expiry.clone(),
            location: self.location.clone(),
            status: STATUS_AVAILABLE.to_string(),
            user_id: Some(user_id.to_string()),
        }
    }

    fn to_update_request(&self) -> ListingUpdateRequest {
        ListingUpdateRequest {
            title: Some(self.title.clone()),
            donor: Some(self.donor.clone()),
            quantity: Some(self.quantity.clone()),
            expiry: Some(self.expiry.clone()),
            location: Some(self.location.clone()),
            ..ListingUpdateRequest::default()
        }
    }
}

/// Asked before a delete request is sent.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// User-facing message for a failed board operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Please fill in every field")]
    Invalid(#[from] ValidationErrors),
    #[error("{notice}")]
    Failed {
        notice: Notice,
        #[source]
        source: ClientError,
    },
}

impl BoardError {
    fn failed(message: &str, source: ClientError) -> Self {
        error!(error = %source, "{}", message);
        Self::Failed {
            notice: Notice::new(message),
            source,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            BoardError::Invalid(_) => Notice::new("Please fill in every field"),
            BoardError::Failed { notice, .. } => notice.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardStats {
    pub active: usize,
    pub this_week: usize,
}

/// Listing grid state. Every successful mutation is followed by a full refetch, and a failed
/// operation leaves the current listings untouched.
pub struct ListingBoard<A> {
    api: A,
    user_id: String,
    listings: Vec<ListingResponse>,
}

impl<A: ListingApi> ListingBoard<A> {
    pub fn new(api: A, user_id: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
            listings: Vec::new(),
        }
    }

    pub fn listings(&self) -> &[ListingResponse] {
        &self.listings
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn refresh(&mut self) -> Result<(), BoardError> {
        let listings = self
            .api
            .list()
            .await
            .map_err(|e| BoardError::failed("Failed to load listings. Please try again.", e))?;
        self.listings = listings;
        Ok(())
    }

    pub async fn create(&mut self, form: &ListingForm) -> Result<ListingResponse, BoardError> {
        form.validate()?;

        let created = self
            .api
            .create(&form.to_create_request(&self.user_id))
            .await
            .map_err(|e| BoardError::failed("Failed to create listing. Please try again.", e))?;

        info!(listing_id = %created.id, "listing created");
        self.refresh().await?;
        Ok(created)
    }

    pub async fn update(&mut self, id: &Uuid, form: &ListingForm) -> Result<(), BoardError> {
        form.validate()?;

        self.api
            .update(id, &form.to_update_request())
            .await
            .map_err(|e| BoardError::failed("Failed to update listing. Please try again.", e))?;

        self.refresh().await
    }

    /// Returns `Ok(false)` without contacting the server when the confirmation is declined.
    pub async fn delete(&mut self, id: &Uuid, confirm: &impl Confirm) -> Result<bool, BoardError> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        self.api
            .delete(id)
            .await
            .map_err(|e| BoardError::failed("Failed to delete listing. Please try again.", e))?;

        self.refresh().await?;
        Ok(true)
    }

    /// Case-insensitive match on title, donor or location. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&ListingResponse> {
        let needle = query.trim().to_lowercase();
        self.listings
            .iter()
            .filter(|listing| {
                needle.is_empty()
                    || [&listing.title, &listing.donor, &listing.location]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn stats(&self) -> BoardStats {
        self.stats_at(Utc::now())
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> BoardStats {
        let week_ago = now - Duration::days(7);
        BoardStats {
            active: self.listings.iter().filter(|l| l.is_available()).count(),
            this_week: self.listings.iter().filter(|l| l.created_at > week_ago && l.created_at <= now).count(),
        }
    }
}
