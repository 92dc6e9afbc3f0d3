//! Headless listing board: the state and request flow behind the dashboard's listing grid
//! and its create/edit/delete dialogs.

pub mod board;
pub mod http;

pub use crate::models::listing::{ListingRequest, ListingResponse, ListingUpdateRequest};
pub use crate::models::mutation::{DeleteResult, UpdateResult};
pub use board::{BoardError, BoardStats, Confirm, ListingBoard, ListingForm, Notice};
pub use http::HttpListingApi;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Any non-success status, with the server's `error` message when it sent one.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// The listing endpoints as seen from a client.
#[async_trait]
pub trait ListingApi: Send + Sync {
    async fn list(&self) -> Result<Vec<ListingResponse>>;
    async fn create(&self, request: &ListingRequest) -> Result<ListingResponse>;
    async fn update(&self, id: &Uuid, request: &ListingUpdateRequest) -> Result<UpdateResult>;
    async fn delete(&self, id: &Uuid) -> Result<DeleteResult>;
}
