use crate::database::postgres_repository::PostgresRepository;
use crate::database::profile::ProfileRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::mutation::{DeleteResult, UpdateResult};
use crate::models::profile::{ProfileLookup, ProfileRequest, ProfileResponse, ProfileUpdateRequest};
use crate::routes::require_id;
use rocket::response::status::Created;
use rocket::serde::json::{Json, serde_json};
use rocket::{State, delete, get, patch, post, put};
use rocket_okapi::openapi;
use sqlx::PgPool;
use validator::Validate;

/// Fetch a profile by `id` or `email` (id wins when both are given), or list all profiles
#[openapi(tag = "Profiles")]
#[get("/?<id>&<email>")]
pub async fn get_profiles(pool: &State<PgPool>, id: Option<String>, email: Option<String>) -> Result<Json<ProfileLookup>, AppError> {
    let repo = PostgresRepository::new(pool);

    let found = if let Some(id) = id.filter(|v| !v.trim().is_empty()) {
        let uuid = require_id(Some(id))?;
        Some(repo.get_profile_by_id(&uuid).await?)
    } else if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
        Some(repo.get_profile_by_email(email.trim()).await?)
    } else {
        None
    };

    match found {
        Some(Some(profile)) => Ok(Json(ProfileLookup::One(ProfileResponse::from(&profile)))),
        Some(None) => Err(AppError::NotFound("Profile not found".to_string())),
        None => {
            let profiles = repo.list_profiles().await?;
            Ok(Json(ProfileLookup::All(profiles.iter().map(ProfileResponse::from).collect())))
        }
    }
}

/// Create a profile; rejected with 409 when the email is already taken
#[openapi(tag = "Profiles")]
#[post("/", data = "<payload>")]
pub async fn create_profile(pool: &State<PgPool>, payload: JsonBody<ProfileRequest>) -> Result<Created<Json<ProfileResponse>>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository::new(pool);
    let profile = repo.create_profile(&payload).await?;

    tracing::info!(profile_id = %profile.id, role = %profile.role, "profile created");

    let location = format!("?id={}", profile.id);
    Ok(Created::new(location).body(Json(ProfileResponse::from(&profile))))
}

/// Merge the given fields into a profile
#[openapi(tag = "Profiles")]
#[put("/?<id>", data = "<payload>")]
pub async fn update_profile(
    pool: &State<PgPool>,
    id: Option<String>,
    payload: Result<JsonBody<ProfileUpdateRequest>, serde_json::Error>,
) -> Result<Json<UpdateResult>, AppError> {
    let uuid = require_id(id)?;
    let payload = payload.map_err(AppError::MalformedBody)?;
    payload.validate()?;

    let repo = PostgresRepository::new(pool);
    let modified = repo.update_profile(&uuid, &payload).await?;
    Ok(Json(UpdateResult::from_count(modified)))
}

/// Remove a profile. The matching credential record is left in place.
#[openapi(tag = "Profiles")]
#[delete("/?<id>")]
pub async fn delete_profile(pool: &State<PgPool>, id: Option<String>) -> Result<Json<DeleteResult>, AppError> {
    let uuid = require_id(id)?;
    let repo = PostgresRepository::new(pool);
    let deleted = repo.delete_profile(&uuid).await?;
    Ok(Json(DeleteResult::from_count(deleted)))
}

#[patch("/")]
pub fn profiles_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    let (mut routes, spec) = rocket_okapi::openapi_get_routes_spec![get_profiles, create_profile, update_profile, delete_profile];
    routes.extend(rocket::routes![profiles_method_not_allowed]);
    (routes, spec)
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{database_client, offline_client, unique_email};
    use rocket::http::{ContentType, Status};
    use rocket::serde::json::{Value, serde_json};

    #[rocket::async_test]
    async fn update_without_id_is_bad_request() {
        let client = offline_client().await;
        let response = client.put("/api/profiles").header(ContentType::JSON).body("{}").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client.put("/api/profiles").header(ContentType::JSON).dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "ID required");
    }

    #[rocket::async_test]
    async fn invalid_email_is_rejected_before_storage() {
        let client = offline_client().await;
        let response = client
            .post("/api/profiles")
            .header(ContentType::JSON)
            .body(r#"{"email":"nope","name":"Ana","role":"donor"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn unknown_role_is_unprocessable() {
        let client = offline_client().await;
        let response = client
            .post("/api/profiles")
            .header(ContentType::JSON)
            .body(r#"{"email":"ana@example.org","name":"Ana","role":"admin"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
    }

    #[rocket::async_test]
    async fn unsupported_method_is_rejected() {
        let client = offline_client().await;
        let response = client.patch("/api/profiles?id=x").dispatch().await;
        assert_eq!(response.status(), Status::MethodNotAllowed);
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn duplicate_profile_is_conflict() {
        let client = database_client().await;
        let email = unique_email("profile");
        let body = serde_json::json!({"email": email, "name": "Ana", "role": "donor"}).to_string();

        let response = client.post("/api/profiles").header(ContentType::JSON).body(body.clone()).dispatch().await;
        assert_eq!(response.status(), Status::Created);
        let created: Value = response.into_json().await.unwrap();

        let response = client.post("/api/profiles").header(ContentType::JSON).body(body).dispatch().await;
        assert_eq!(response.status(), Status::Conflict);
        let error: Value = response.into_json().await.unwrap();
        assert_eq!(error["error"], "Profile already exists");

        let response = client.get(format!("/api/profiles?email={email}")).dispatch().await;
        let fetched: Value = response.into_json().await.unwrap();
        assert_eq!(fetched["id"], created["id"]);

        let response = client.get(format!("/api/profiles?id=&email={email}")).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let fetched: Value = response.into_json().await.unwrap();
        assert_eq!(fetched["id"], created["id"]);

        let response = client.get("/api/profiles").dispatch().await;
        let all: Vec<Value> = response.into_json().await.unwrap();
        assert_eq!(all.iter().filter(|p| p["email"] == email.as_str()).count(), 1);

        let id = created["id"].as_str().unwrap();
        client.delete(format!("/api/profiles?id={id}")).dispatch().await;
    }
}
