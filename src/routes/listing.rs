use crate::database::listing::ListingRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::listing::{ListingLookup, ListingRequest, ListingResponse, ListingUpdateRequest};
use crate::models::mutation::{DeleteResult, UpdateResult};
use crate::routes::require_id;
use rocket::response::status::Created;
use rocket::serde::json::{Json, serde_json};
use rocket::{State, delete, get, patch, post, put};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// Fetch one listing by `id`, or every listing newest first
#[openapi(tag = "Listings")]
#[get("/?<id>")]
pub async fn get_listings(pool: &State<PgPool>, id: Option<String>) -> Result<Json<ListingLookup>, AppError> {
    let repo = PostgresRepository::new(pool);

    if let Some(id) = id.filter(|v| !v.trim().is_empty()) {
        let uuid = require_id(Some(id))?;
        let listing = repo
            .get_listing_by_id(&uuid)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;
        return Ok(Json(ListingLookup::One(ListingResponse::from(&listing))));
    }

    let listings = repo.list_listings().await?;
    Ok(Json(ListingLookup::All(listings.iter().map(ListingResponse::from).collect())))
}

/// Post a new listing
#[openapi(tag = "Listings")]
#[post("/", data = "<payload>")]
pub async fn create_listing(pool: &State<PgPool>, payload: JsonBody<ListingRequest>) -> Result<Created<Json<ListingResponse>>, AppError> {
    let repo = PostgresRepository::new(pool);
    let listing = repo.create_listing(&payload).await?;

    tracing::info!(listing_id = %listing.id, "listing created");

    let location = format!("?id={}", listing.id);
    Ok(Created::new(location).body(Json(ListingResponse::from(&listing))))
}

/// Merge the given fields into a listing
#[openapi(tag = "Listings")]
#[put("/?<id>", data = "<payload>")]
pub async fn update_listing(
    pool: &State<PgPool>,
    id: Option<String>,
    payload: Result<JsonBody<ListingUpdateRequest>, serde_json::Error>,
) -> Result<Json<UpdateResult>, AppError> {
    let uuid = require_id(id)?;
    let payload = payload.map_err(AppError::MalformedBody)?;
    if payload.is_empty() {
        tracing::debug!(listing_id = %uuid, "empty listing update, only updatedAt changes");
    }

    let repo = PostgresRepository::new(pool);
    let modified = repo.update_listing(&uuid, &payload).await?;
    Ok(Json(UpdateResult::from_count(modified)))
}

/// Remove a listing
#[openapi(tag = "Listings")]
#[delete("/?<id>")]
pub async fn delete_listing(pool: &State<PgPool>, id: Option<String>) -> Result<Json<DeleteResult>, AppError> {
    let uuid = require_id(id)?;
    let repo = PostgresRepository::new(pool);
    let deleted = repo.delete_listing(&uuid).await?;
    Ok(Json(DeleteResult::from_count(deleted)))
}

#[patch("/")]
pub fn listings_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    let (mut routes, spec) = rocket_okapi::openapi_get_routes_spec![get_listings, create_listing, update_listing, delete_listing];
    routes.extend(rocket::routes![listings_method_not_allowed]);
    (routes, spec)
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{database_client, offline_client};
    use rocket::http::{ContentType, Status};
    use rocket::serde::json::{Value, serde_json};

    #[rocket::async_test]
    async fn update_without_id_is_bad_request() {
        let client = offline_client().await;
        let response = client
            .put("/api/listings")
            .header(ContentType::JSON)
            .body(r#"{"quantity":"3L"}"#)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "ID required");
    }

    #[rocket::async_test]
    async fn missing_id_is_reported_before_the_body() {
        let client = offline_client().await;
        let response = client.put("/api/listings").header(ContentType::JSON).dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "ID required");

        let response = client
            .put(format!("/api/listings?id={}", uuid::Uuid::new_v4()))
            .header(ContentType::JSON)
            .body("{not json")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "Malformed request body");
    }

    #[rocket::async_test]
    async fn delete_without_id_is_bad_request() {
        let client = offline_client().await;
        let response = client.delete("/api/listings").dispatch().await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "ID required");
    }

    #[rocket::async_test]
    async fn malformed_id_is_bad_request() {
        let client = offline_client().await;
        let response = client.delete("/api/listings?id=not-a-uuid").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client.get("/api/listings?id=not-a-uuid").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn unsupported_method_is_rejected() {
        let client = offline_client().await;
        let response = client.patch("/api/listings").dispatch().await;

        assert_eq!(response.status(), Status::MethodNotAllowed);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "Method not allowed");
    }

    #[rocket::async_test]
    async fn malformed_body_is_unprocessable() {
        let client = offline_client().await;
        let response = client
            .post("/api/listings")
            .header(ContentType::JSON)
            .body(r#"{"title":"Milk"}"#)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body: Value = response.into_json().await.unwrap();
        assert!(body["error"].is_string());
    }

    #[rocket::async_test]
    async fn any_origin_is_allowed() {
        let client = offline_client().await;
        let response = client
            .delete("/api/listings")
            .header(rocket::http::Header::new("Origin", "https://agriconnect.example"))
            .dispatch()
            .await;

        assert_eq!(response.headers().get_one("Access-Control-Allow-Origin"), Some("*"));
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn create_update_get_delete_flow() {
        let client = database_client().await;

        let response = client
            .post("/api/listings")
            .header(ContentType::JSON)
            .body(
                serde_json::json!({
                    "title": "Milk",
                    "donor": "Farm A",
                    "quantity": "2L",
                    "expiry": "2025-01-01",
                    "location": "East",
                    "status": "available",
                    "userId": "u1"
                })
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let created: Value = response.into_json().await.unwrap();
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["createdAt"], created["updatedAt"]);

        let response = client
            .put(format!("/api/listings?id={id}"))
            .header(ContentType::JSON)
            .body(r#"{"quantity":"3L"}"#)
            .dispatch()
            .await;
        let updated: Value = response.into_json().await.unwrap();
        assert_eq!(updated, serde_json::json!({"success": true, "modifiedCount": 1}));

        let response = client.get(format!("/api/listings?id={id}")).dispatch().await;
        let fetched: Value = response.into_json().await.unwrap();
        assert_eq!(fetched["quantity"], "3L");
        assert_eq!(fetched["title"], "Milk");
        assert_eq!(fetched["createdAt"], created["createdAt"]);

        let response = client.delete(format!("/api/listings?id={id}")).dispatch().await;
        let deleted: Value = response.into_json().await.unwrap();
        assert_eq!(deleted, serde_json::json!({"success": true, "deletedCount": 1}));

        let response = client.delete(format!("/api/listings?id={id}")).dispatch().await;
        let deleted: Value = response.into_json().await.unwrap();
        assert_eq!(deleted, serde_json::json!({"success": false, "deletedCount": 0}));

        let response = client.get(format!("/api/listings?id={id}")).dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn blank_id_lists_everything() {
        let client = database_client().await;
        let response = client.get("/api/listings?id=").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert!(body.is_array());
    }
}
