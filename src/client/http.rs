use crate::client::{ClientError, ListingApi, Result};
use crate::models::listing::{ListingRequest, ListingResponse, ListingUpdateRequest};
use crate::models::mutation::{DeleteResult, UpdateResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`ListingApi`] over HTTP, e.g. `HttpListingApi::new("https://agriconnect.example/api")`.
pub struct HttpListingApi {
    http: Client,
    listings_url: String,
}

impl HttpListingApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl("URL must start with http:// or https://".into()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("AgriConnect/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            listings_url: format!("{}/listings", base_url),
        })
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse listing response: {}", e)));
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text).map(|body| body.error).unwrap_or(text);
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ListingApi for HttpListingApi {
    async fn list(&self) -> Result<Vec<ListingResponse>> {
        debug!(url = %self.listings_url, "Fetching listings");
        let response = self.http.get(&self.listings_url).send().await?;
        parse(response).await
    }

    async fn create(&self, request: &ListingRequest) -> Result<ListingResponse> {
        let response = self.http.post(&self.listings_url).json(request).send().await?;
        parse(response).await
    }

    async fn update(&self, id: &Uuid, request: &ListingUpdateRequest) -> Result<UpdateResult> {
        let response = self
            .http
            .put(&self.listings_url)
            .query(&[("id", id.to_string())])
            .json(request)
            .send()
            .await?;
        parse(response).await
    }

    async fn delete(&self, id: &Uuid) -> Result<DeleteResult> {
        let response = self.http.delete(&self.listings_url).query(&[("id", id.to_string())]).send().await?;
        parse(response).await
    }
}
