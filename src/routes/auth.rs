use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::profile::ProfileRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::user::{AuthRequest, AuthResponse, UserSummary};
use crate::service::auth::{AuthAction, AuthService};
use crate::service::token::TokenService;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{State, delete, get, patch, post, put};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// Sign up (`?action=signup`, 201) or log in (`?action=login`, 200)
#[openapi(tag = "Auth")]
#[post("/?<action>", data = "<payload>")]
pub async fn authenticate(
    pool: &State<PgPool>,
    tokens: &State<TokenService>,
    action: Option<String>,
    payload: JsonBody<AuthRequest>,
) -> Result<Custom<Json<AuthResponse>>, AppError> {
    let action: AuthAction = action.as_deref().unwrap_or_default().parse()?;

    let repo = PostgresRepository::new(pool);
    let service = AuthService::new(&repo, tokens);
    let response = service.handle(action, &payload).await?;

    let status = match action {
        AuthAction::Signup => Status::Created,
        AuthAction::Login => Status::Ok,
    };
    Ok(Custom(status, Json(response)))
}

/// Summary of the user the bearer token was issued to
#[openapi(tag = "Auth")]
#[get("/me")]
pub async fn current_user(pool: &State<PgPool>, current_user: CurrentUser) -> Result<Json<UserSummary>, AppError> {
    tracing::debug!(user_id = %current_user.id, "resolving current user");
    let repo = PostgresRepository::new(pool);
    let profile = repo.get_profile_by_email(&current_user.email).await?;
    Ok(Json(UserSummary::new(&current_user.email, profile.as_ref())))
}

#[get("/")]
pub fn auth_get_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[put("/")]
pub fn auth_put_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[delete("/")]
pub fn auth_delete_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[patch("/")]
pub fn auth_patch_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    let (mut routes, spec) = rocket_okapi::openapi_get_routes_spec![authenticate, current_user];
    routes.extend(rocket::routes![
        auth_get_not_allowed,
        auth_put_not_allowed,
        auth_delete_not_allowed,
        auth_patch_not_allowed
    ]);
    (routes, spec)
}
