use crate::error::app_error::AppError;
use crate::service::token::TokenService;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::{Object, Responses, SecurityRequirement, SecurityScheme, SecuritySchemeData};
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use serde::Serialize;
use uuid::Uuid;

/// Caller identified by a valid, unexpired bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

pub(crate) fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let Some(tokens) = req.rocket().state::<TokenService>() else {
            return Outcome::Error((Status::InternalServerError, AppError::Unauthorized));
        };

        let Some(token) = req.headers().get_one("Authorization").and_then(parse_bearer) else {
            return Outcome::Error((Status::Unauthorized, AppError::Unauthorized));
        };

        match tokens.verify(token) {
            Ok(claims) => match Uuid::parse_str(&claims.sub) {
                Ok(id) => Outcome::Success(CurrentUser { id, email: claims.email }),
                Err(_) => Outcome::Error((Status::Unauthorized, AppError::Unauthorized)),
            },
            Err(err) => Outcome::Error((Status::Unauthorized, err)),
        }
    }
}

impl<'a> OpenApiFromRequest<'a> for CurrentUser {
    fn from_request_input(_gen: &mut OpenApiGenerator, _name: String, _required: bool) -> rocket_okapi::Result<RequestHeaderInput> {
        let security_scheme = SecurityScheme {
            description: Some("Bearer token returned by POST /api/auth?action=signup|login.".to_string()),
            data: SecuritySchemeData::Http {
                scheme: "bearer".to_string(),
                bearer_format: Some("JWT".to_string()),
            },
            extensions: Object::default(),
        };

        let mut security_req = SecurityRequirement::new();
        security_req.insert("bearerAuth".to_string(), Vec::new());

        Ok(RequestHeaderInput::Security("bearerAuth".to_string(), security_scheme, security_req))
    }

    fn get_responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response};
        let mut responses = Responses::default();
        responses.responses.insert(
            "401".to_string(),
            RefOr::Object(Response {
                description: "Unauthorized - missing, forged or expired token".to_string(),
                ..Default::default()
            }),
        );
        Ok(responses)
    }
}
